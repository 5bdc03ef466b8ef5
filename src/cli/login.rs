use super::ui;
use crate::api::auth;
use crate::auth::Session;
use crate::context::AppContext;
use crate::store::{self, FORM_COLLECTION};
use anyhow::{Context, Result};
use console::Term;
use tracing::debug;

const USERNAME_KEY: &str = "login.username";

/// Interactive login: prompts for credentials, exchanges them for a
/// session and persists it. The last-submitted username is remembered as
/// form-repeat data.
pub async fn run(ctx: &AppContext, username: Option<String>) -> Result<()> {
    let (_auth, catalog) = super::ready_with_fallback(ctx).await?;
    let term = Term::stderr();
    let forms = ctx.store_collection(FORM_COLLECTION);

    let username = match username {
        Some(name) => name,
        None => {
            let remembered: Option<String> =
                store::get_typed(forms.as_ref(), USERNAME_KEY).await;
            let prompt = match &remembered {
                Some(name) => format!("{} [{}]: ", catalog.t("login.username"), name),
                None => format!("{}: ", catalog.t("login.username")),
            };
            term.write_str(&prompt).context("Terminal unavailable")?;
            let typed = term.read_line().context("Terminal unavailable")?;
            let typed = typed.trim();
            if typed.is_empty() {
                remembered.context("No username given")?
            } else {
                typed.to_string()
            }
        }
    };

    term.write_str(&format!("{}: ", catalog.t("login.password")))
        .context("Terminal unavailable")?;
    let password = term.read_secure_line().context("Terminal unavailable")?;

    loop {
        match auth::login(&ctx.client(), &username, &password).await {
            Ok(response) => {
                let session = Session::from_token(&response.token, response.premium);
                ctx.session_store().save(&session).await;
                ctx.client().set_bearer(Some(session.token.clone()));
                store::put_typed(forms.as_ref(), USERNAME_KEY, &username, None).await;

                let mut message = catalog.t("login.success").to_string();
                if session.premium {
                    message.push_str(&format!(" ({})", catalog.t("login.premium")));
                }
                println!("{}", ui::style_text(&message, ui::StyleType::TotalValue));
                return Ok(());
            }
            Err(error) => {
                debug!("Login failed: {error}");
                if !super::prompt_retry(catalog, &error) {
                    return Ok(());
                }
            }
        }
    }
}

/// Destroys the session: best-effort server-side invalidation, then the
/// local copy is cleared regardless of what the backend said.
pub async fn logout(ctx: &AppContext) -> Result<()> {
    let (auth_ctx, catalog) = super::ready_with_fallback(ctx).await?;

    if auth_ctx.is_authenticated() {
        if let Err(error) = auth::logout(&ctx.client()).await {
            debug!("Server-side logout failed: {error}");
        }
    }

    ctx.session_store().clear().await;
    ctx.client().set_bearer(None);
    println!(
        "{}",
        ui::style_text(catalog.t("logout.success"), ui::StyleType::Subtle)
    );
    Ok(())
}
