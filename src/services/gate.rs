// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page access decisions from the session and onboarding signals.

pub const LOGIN_PATH: &str = "/login";
pub const ONBOARDING_PATH: &str = "/onboarding";
pub const HOME_PATH: &str = "/";

/// Paths reachable without a session.
const PUBLIC_PATHS: [&str; 2] = [LOGIN_PATH, ONBOARDING_PATH];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

impl GateDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateDecision::Allow => "allow",
            GateDecision::Redirect(_) => "redirect",
        }
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GateDecision::Allow => None,
            GateDecision::Redirect(path) => Some(*path),
        }
    }
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

pub fn decide(path: &str, authenticated: bool, onboarded: bool) -> GateDecision {
    if !authenticated {
        return if is_public(path) {
            GateDecision::Allow
        } else {
            GateDecision::Redirect(LOGIN_PATH)
        };
    }

    if path == LOGIN_PATH {
        return GateDecision::Redirect(if onboarded { HOME_PATH } else { ONBOARDING_PATH });
    }

    GateDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_sent_to_login() {
        assert_eq!(decide("/weekly", false, false), GateDecision::Redirect("/login"));
        assert_eq!(decide("/", false, false), GateDecision::Redirect("/login"));
    }

    #[test]
    fn test_anonymous_may_view_public_pages() {
        assert_eq!(decide("/login", false, false), GateDecision::Allow);
        assert_eq!(decide("/onboarding", false, false), GateDecision::Allow);
        assert_eq!(decide("/loginx", false, false), GateDecision::Redirect("/login"));
        assert_eq!(decide("/login/anything", false, false), GateDecision::Redirect("/login"));
        assert_eq!(
            decide("/onboarding/step-2", false, false),
            GateDecision::Redirect("/login")
        );
    }

    #[test]
    fn test_login_page_bounces_signed_in_users() {
        assert_eq!(decide("/login", true, true), GateDecision::Redirect("/"));
        assert_eq!(decide("/login", true, false), GateDecision::Redirect("/onboarding"));
    }

    #[test]
    fn test_signed_in_users_pass_elsewhere() {
        assert_eq!(decide("/weekly", true, false), GateDecision::Allow);
        assert_eq!(decide("/onboarding", true, true), GateDecision::Allow);
    }
}
