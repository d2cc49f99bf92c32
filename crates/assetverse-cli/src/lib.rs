use assetverse_app::{RouteDecision, SessionState, UploadState};
use assetverse_core::{NavLink, Role, Session};
use chrono::SecondsFormat;
use serde_json::{json, Value};

/// Render a link set as an aligned two-column table.
pub fn nav_table(links: &[NavLink]) -> String {
    let width = links.iter().map(|l| l.label.len()).max().unwrap_or(0);
    links
        .iter()
        .map(|l| format!("{:<width$}  {}", l.label, l.path, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Session as printed by `whoami`.
pub fn session_json(session: &Session) -> Value {
    let avatar_url = session.has_avatar().then_some(&session.avatar_url);
    json!({
        "display_name": session.display_name,
        "email": session.email,
        "role": session.role,
        "avatar_url": avatar_url,
        "initials": session.initials(),
        "signed_in_at": session.signed_in_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

/// Session state for a hypothetical user, used by `route` to explore the redirect rule.
pub fn simulated_state(role: Option<Role>, signed_out: bool) -> SessionState {
    match role {
        Some(role) if !signed_out => SessionState::signed_in(Session::from_provider(
            assetverse_core::ProviderUser {
                display_name: Some("Simulated User".to_string()),
                email: Some("simulated@assetverse.local".to_string()),
                photo_url: None,
                role: Some(role),
            },
        )),
        _ => SessionState::signed_out(),
    }
}

pub fn route_json(route: &str, decision: RouteDecision) -> Value {
    match decision {
        RouteDecision::ShowLoading => json!({ "route": route, "decision": "loading" }),
        RouteDecision::Redirect(target) => {
            json!({ "route": route, "decision": "redirect", "target": target })
        }
        RouteDecision::Render => json!({ "route": route, "decision": "render" }),
    }
}

/// Upload outcome summary, without the file bytes or preview.
pub fn upload_summary(state: &UploadState) -> Value {
    json!({
        "phase": state.phase,
        "target_folder": state.target_folder,
        "selected": state.selected.as_ref().map(|s| s.describe()),
        "result": state.result,
        "error": state.error,
    })
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetverse_app::links_for;
    use assetverse_core::ProviderUser;

    #[test]
    fn nav_table_aligns_paths() {
        let table = nav_table(links_for(Some(Role::Employee)));
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Dashboard      /dashboard/employee-home");
        assert_eq!(lines[4], "Profile        /dashboard/profile");
    }

    #[test]
    fn session_json_hides_missing_avatar() {
        let session = Session::from_provider(ProviderUser {
            display_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            photo_url: None,
            role: Some(Role::Hr),
        });
        let value = session_json(&session);
        assert_eq!(value["role"], "hr");
        assert_eq!(value["initials"], "AL");
        assert!(value["avatar_url"].is_null());
    }

    #[test]
    fn simulated_state_respects_signed_out() {
        assert!(simulated_state(Some(Role::Hr), false).is_signed_in());
        assert!(!simulated_state(Some(Role::Hr), true).is_signed_in());
        assert!(!simulated_state(None, false).is_signed_in());
    }

    #[test]
    fn route_json_shapes() {
        assert_eq!(
            route_json("/dashboard", RouteDecision::Redirect("/login"))["target"],
            "/login"
        );
        assert_eq!(
            route_json("/dashboard/profile", RouteDecision::Render)["decision"],
            "render"
        );
    }
}
