use uuid::Uuid;

/// Authenticated identity passed into the gate explicitly, never read from
/// ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Uuid,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    /// Unauthenticated viewers are sent to login, never silently denied.
    LoginRequired,
    /// Premium-tagged content and a non-admin viewer: the caller must
    /// consult the entitlement ledger before serving.
    RequiresEntitlement,
}

pub fn premium_tagged(tags: Option<&str>) -> bool {
    tags.map(|tags| tags.to_lowercase().contains("premium"))
        .unwrap_or(false)
}

/// Gate evaluated at the top of protected content routes. Admins always
/// pass; the entitlement lookup is deferred so it only runs when the
/// content is actually premium-tagged.
pub fn evaluate(viewer: Option<&Viewer>, tags: Option<&str>) -> AccessDecision {
    match viewer {
        Some(viewer) if viewer.is_admin => AccessDecision::Granted,
        None => AccessDecision::LoginRequired,
        Some(_) if premium_tagged(tags) => AccessDecision::RequiresEntitlement,
        Some(_) => AccessDecision::Granted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(is_admin: bool) -> Viewer {
        Viewer {
            user_id: Uuid::parse_str("9f2c8d3e-1111-2222-3333-444455556666").unwrap(),
            is_admin,
        }
    }

    #[test]
    fn test_admin_always_passes() {
        let admin = viewer(true);
        assert_eq!(
            evaluate(Some(&admin), Some("Premium, Trending")),
            AccessDecision::Granted
        );
        assert_eq!(evaluate(Some(&admin), None), AccessDecision::Granted);
    }

    #[test]
    fn test_unauthenticated_is_sent_to_login() {
        assert_eq!(evaluate(None, None), AccessDecision::LoginRequired);
        assert_eq!(
            evaluate(None, Some("Premium")),
            AccessDecision::LoginRequired
        );
    }

    #[test]
    fn test_premium_tag_match_is_case_insensitive_substring() {
        assert!(premium_tagged(Some("Premium")));
        assert!(premium_tagged(Some("trending, PREMIUM, popular")));
        assert!(!premium_tagged(Some("Trending, Popular")));
        assert!(!premium_tagged(None));
    }

    #[test]
    fn test_member_needs_entitlement_only_for_premium_content() {
        let member = viewer(false);
        assert_eq!(
            evaluate(Some(&member), Some("Premium")),
            AccessDecision::RequiresEntitlement
        );
        assert_eq!(
            evaluate(Some(&member), Some("Trending")),
            AccessDecision::Granted
        );
        assert_eq!(evaluate(Some(&member), None), AccessDecision::Granted);
    }
}
