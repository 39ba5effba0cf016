//! Session gate: decides whether a route may be entered with the stored token.
//!
//! The gate checks once. `Unchecked` resolves to `Authenticated` when a
//! bearer token is present and to `Unauthenticated` otherwise, and the answer
//! is kept for the gate's lifetime. Expired tokens are the transport's
//! problem: they come back as `ApiError::Unauthorized`.

use tone_core::Session;

pub const LOGIN_ROUTE: &str = "/auth/login";

/// Routes reachable without a session. Subpaths are public too.
pub const PUBLIC_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/signup",
    "/auth/forgotpassword",
    "/auth/check-email",
    "/auth/emailverification",
    "/auth/verify_signup",
    "/auth/reset-password",
    "/auth/onboard",
    "/verify/user_to_workspace",
    "/auth/forgotpasswordverification",
];

/// Where a bearer token comes from.
pub trait TokenSource {
    fn bearer_token(&self) -> Option<String>;
}

impl TokenSource for Session {
    fn bearer_token(&self) -> Option<String> {
        Session::bearer_token(self).map(str::to_owned)
    }
}

impl TokenSource for Option<Session> {
    fn bearer_token(&self) -> Option<String> {
        self.as_ref().and_then(TokenSource::bearer_token)
    }
}

impl TokenSource for Option<String> {
    fn bearer_token(&self) -> Option<String> {
        self.as_deref()
            .filter(|token| !token.trim().is_empty())
            .map(str::to_owned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unchecked,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Redirect { location: String },
}

pub struct SessionGate<S> {
    source: S,
    state: GateState,
}

impl<S: TokenSource> SessionGate<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: GateState::Unchecked,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Resolve the gate if it has not been resolved yet.
    pub fn check(&mut self) -> GateState {
        if self.state == GateState::Unchecked {
            self.state = match self.source.bearer_token() {
                Some(_) => GateState::Authenticated,
                None => GateState::Unauthenticated,
            };
            tracing::debug!(state = ?self.state, "session gate resolved");
        }
        self.state
    }

    pub fn is_authenticated(&mut self) -> bool {
        self.check() == GateState::Authenticated
    }

    /// Decide what to do with a request for `path`.
    pub fn guard(&mut self, path: &str) -> GateDecision {
        if is_static_asset(path) || is_public_path(path) {
            return GateDecision::Proceed;
        }
        match self.check() {
            GateState::Authenticated => GateDecision::Proceed,
            _ => GateDecision::Redirect {
                location: login_redirect(path),
            },
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|public| {
        path == *public
            || path
                .strip_prefix(public)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn is_static_asset(path: &str) -> bool {
    path.starts_with("/_next") || path.starts_with("/favicon") || path.contains('.')
}

/// The login route, remembering where to go afterwards.
pub fn login_redirect(path: &str) -> String {
    format!("{LOGIN_ROUTE}?redirect={}", urlencoding::encode(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    struct Counting {
        token: Option<String>,
        reads: Cell<u32>,
    }

    impl TokenSource for Counting {
        fn bearer_token(&self) -> Option<String> {
            self.reads.set(self.reads.get() + 1);
            self.token.clone()
        }
    }

    #[test]
    fn starts_unchecked_and_resolves_once() {
        let mut gate = SessionGate::new(Counting {
            token: Some("abc".into()),
            reads: Cell::new(0),
        });
        assert_eq!(gate.state(), GateState::Unchecked);
        assert_eq!(gate.check(), GateState::Authenticated);
        assert_eq!(gate.check(), GateState::Authenticated);
        assert_eq!(gate.source().reads.get(), 1);
    }

    #[test]
    fn missing_token_redirects_with_return_path() {
        let mut gate = SessionGate::new(None::<Session>);
        assert_eq!(
            gate.guard("/agents"),
            GateDecision::Redirect {
                location: "/auth/login?redirect=%2Fagents".into()
            }
        );
        assert_eq!(gate.state(), GateState::Unauthenticated);
    }

    #[test]
    fn blank_token_is_unauthenticated() {
        let mut gate = SessionGate::new(Some("   ".to_string()));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn authenticated_gate_proceeds() {
        let mut gate = SessionGate::new(Some("tok".to_string()));
        assert_eq!(gate.guard("/settings"), GateDecision::Proceed);
    }

    #[rstest]
    #[case("/auth/login", true)]
    #[case("/auth/signup/step-2", true)]
    #[case("/auth/loginx", false)]
    #[case("/verify/user_to_workspace", true)]
    #[case("/integrations", false)]
    fn public_paths_match_exact_or_subpath(#[case] path: &str, #[case] public: bool) {
        assert_eq!(is_public_path(path), public);
    }

    #[rstest]
    #[case("/_next/static/chunk.js")]
    #[case("/favicon.ico")]
    #[case("/logo.svg")]
    #[case("/auth/reset-password")]
    fn bypassed_paths_never_read_the_token(#[case] path: &str) {
        let mut gate = SessionGate::new(Counting {
            token: None,
            reads: Cell::new(0),
        });
        assert_eq!(gate.guard(path), GateDecision::Proceed);
        assert_eq!(gate.state(), GateState::Unchecked);
        assert_eq!(gate.source().reads.get(), 0);
    }
}
