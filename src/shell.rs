//! Terminal front end.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stands in for the browser pages: renders the committed route as text and
//! turns user commands into navigations and service calls. Every screen
//! change goes through the router, so the guard gates each page exactly as
//! the SPA's pre-navigation hook did. Render failures print a diagnostic and
//! keep the shell alive.

use std::io::Write as _;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use crate::routes::{CREATE_EVENT_PATH, EVENTS_PATH, MYPAGE_PATH, Page, RouteMatch, Router};
use crate::services::api::ApiError;
use crate::services::events::EventDraft;
use crate::services::profile::Profile;
use crate::state::AppState;

const HELP: &str = "\
commands:
  go PATH                                  navigate (e.g. go /events, go /mypage)
  login EMAIL PASSWORD                     sign in
  signup EMAIL PASSWORD [NAME]             create an account
  logout                                   sign out
  post TITLE; LOCATION; WHEN; DESCRIPTION  create an event (WHEN is RFC 3339)
  profile NAME; NEIGHBORHOOD; BIO          save your profile
  help                                     show this help
  quit                                     exit";

/// Run the interactive shell until stdin closes or the user quits.
pub async fn run(state: AppState) {
    let mut router = Router::new(state.auth.clone());

    println!("neighborlink ({})", state.config.api_base);
    println!("{HELP}");
    // First navigation waits for the initial auth determination.
    goto(&mut router, &state, "/").await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let Ok(Some(line)) = lines.next_line().await else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            "go" => goto(&mut router, &state, rest.trim()).await,
            "login" => login(&mut router, &state, rest).await,
            "signup" => signup(&mut router, &state, rest).await,
            "logout" => logout(&mut router, &state).await,
            "post" => post(&mut router, &state, rest).await,
            "profile" => save_profile(&mut router, &state, rest).await,
            _ => println!("unknown command; type `help`"),
        }
    }
}

async fn goto(router: &mut Router, state: &AppState, path: &str) {
    match router.navigate(path).await {
        Ok(committed) => {
            if let Err(e) = render(state, &committed).await {
                println!("error: {e}");
            }
        }
        Err(e) => tracing::error!(error = %e, "navigation failed"),
    }
}

// =============================================================================
// PAGES
// =============================================================================

async fn render(state: &AppState, route: &RouteMatch) -> Result<(), ApiError> {
    match route.descriptor.page {
        Page::Login => {
            println!("-- log in --");
            println!("use: login EMAIL PASSWORD");
        }
        Page::SignUp => {
            println!("-- sign up --");
            println!("use: signup EMAIL PASSWORD [NAME]");
        }
        Page::Events => {
            let events = state.api.list_events().await?;
            println!("-- upcoming events ({}) --", events.len());
            for event in &events {
                println!(
                    "  {}  {}  @ {}  [{}]",
                    format_when(event.starts_at),
                    event.title,
                    event.location,
                    event.id
                );
            }
            if events.is_empty() {
                println!("  nothing posted yet");
            }
        }
        Page::EventDetail => {
            let id = route
                .param("id")
                .and_then(|raw| Uuid::parse_str(raw).ok())
                .ok_or(ApiError::NotFound)?;
            let event = state.api.get_event(id).await?;
            println!("-- {} --", event.title);
            println!("when:  {}", format_when(event.starts_at));
            println!("where: {}", event.location);
            println!("host:  {}", event.host_name.as_deref().unwrap_or(&event.host_uid));
            if !event.description.is_empty() {
                println!("{}", event.description);
            }
        }
        Page::CreateEvent => {
            println!("-- new event --");
            println!("use: post TITLE; LOCATION; WHEN; DESCRIPTION");
        }
        Page::MyPage => {
            // Guarded route, so an identity is present.
            let Some(identity) = state.auth.identity() else {
                println!("-- mypage: not signed in --");
                return Ok(());
            };
            let profile = state
                .api
                .get_profile(&identity.uid, &identity.id_token)
                .await?
                .unwrap_or_else(|| Profile::empty(&identity.uid, identity.display_name.as_deref()));
            println!("-- mypage --");
            println!("email:        {}", identity.email);
            println!("name:         {}", or_unset(&profile.display_name));
            println!("neighborhood: {}", or_unset(&profile.neighborhood));
            println!("bio:          {}", or_unset(&profile.bio));
            println!("use: profile NAME; NEIGHBORHOOD; BIO");
        }
        Page::NotFound => println!("-- not found: {} --", route.path),
    }
    Ok(())
}

fn format_when(when: OffsetDateTime) -> String {
    when.format(&Rfc3339).unwrap_or_else(|_| "unknown time".into())
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() { "(not set)" } else { value }
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn login(router: &mut Router, state: &AppState, args: &str) {
    let mut parts = args.split_whitespace();
    let (Some(email), Some(password)) = (parts.next(), parts.next()) else {
        println!("use: login EMAIL PASSWORD");
        return;
    };
    match state.provider.sign_in(email, password).await {
        Ok(identity) => {
            println!("signed in as {}", identity.email);
            goto(router, state, EVENTS_PATH).await;
        }
        Err(e) => println!("sign-in failed: {e}"),
    }
}

async fn signup(router: &mut Router, state: &AppState, args: &str) {
    let mut parts = args.split_whitespace();
    let (Some(email), Some(password)) = (parts.next(), parts.next()) else {
        println!("use: signup EMAIL PASSWORD [NAME]");
        return;
    };
    let name = parts.collect::<Vec<_>>().join(" ");
    let display_name = if name.is_empty() { None } else { Some(name.as_str()) };
    match state.provider.sign_up(email, password, display_name).await {
        Ok(identity) => {
            println!("welcome, {}", identity.display_name.as_deref().unwrap_or(&identity.email));
            goto(router, state, EVENTS_PATH).await;
        }
        Err(e) => println!("sign-up failed: {e}"),
    }
}

async fn logout(router: &mut Router, state: &AppState) {
    match state.auth.logout().await {
        Ok(()) => {
            println!("signed out");
            // Re-run the current location so guarded pages bounce to login.
            let path = router
                .current()
                .map_or_else(|| "/".to_owned(), |m| m.path.clone());
            goto(router, state, &path).await;
        }
        Err(e) => println!("logout failed: {e}"),
    }
}

async fn post(router: &mut Router, state: &AppState, args: &str) {
    let fields: Vec<&str> = args.split(';').map(str::trim).collect();
    if fields.len() < 3 {
        println!("use: post TITLE; LOCATION; WHEN; DESCRIPTION");
        return;
    }
    let Ok(starts_at) = OffsetDateTime::parse(fields[2], &Rfc3339) else {
        println!("WHEN must be RFC 3339, e.g. 2026-09-01T18:00:00Z");
        return;
    };

    // Navigate first so the guard vets access to the create page.
    let committed = match router.navigate(CREATE_EVENT_PATH).await {
        Ok(committed) => committed,
        Err(e) => {
            tracing::error!(error = %e, "navigation failed");
            return;
        }
    };
    if committed.descriptor.page != Page::CreateEvent {
        println!("sign in to post an event");
        if let Err(e) = render(state, &committed).await {
            println!("error: {e}");
        }
        return;
    }
    let Some(identity) = state.auth.identity() else {
        println!("sign in to post an event");
        return;
    };

    let draft = EventDraft {
        title: fields[0].to_owned(),
        location: fields[1].to_owned(),
        starts_at,
        description: fields.get(3).copied().unwrap_or_default().to_owned(),
    };
    match state.api.create_event(&draft, &identity.id_token).await {
        Ok(event) => {
            println!("posted: {}", event.title);
            goto(router, state, EVENTS_PATH).await;
        }
        Err(e) => println!("could not post event: {e}"),
    }
}

async fn save_profile(router: &mut Router, state: &AppState, args: &str) {
    let committed = match router.navigate(MYPAGE_PATH).await {
        Ok(committed) => committed,
        Err(e) => {
            tracing::error!(error = %e, "navigation failed");
            return;
        }
    };
    if committed.descriptor.page != Page::MyPage {
        println!("sign in to edit your profile");
        if let Err(e) = render(state, &committed).await {
            println!("error: {e}");
        }
        return;
    }
    let Some(identity) = state.auth.identity() else {
        println!("sign in to edit your profile");
        return;
    };

    let mut fields = args.split(';').map(str::trim);
    let profile = Profile {
        uid: identity.uid.clone(),
        display_name: fields.next().unwrap_or_default().to_owned(),
        neighborhood: fields.next().unwrap_or_default().to_owned(),
        bio: fields.next().unwrap_or_default().to_owned(),
    };
    match state.api.update_profile(&profile, &identity.id_token).await {
        Ok(()) => {
            println!("profile saved");
            goto(router, state, MYPAGE_PATH).await;
        }
        Err(e) => println!("could not save profile: {e}"),
    }
}
