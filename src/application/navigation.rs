//! Navigation shell: current page plus the signed-in user.

use crate::domain::UserSession;

/// Top-level pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Home,
    SignIn,
    SignUp,
    History,
}

impl Page {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Risk Assessment",
            Self::SignIn => "Sign In",
            Self::SignUp => "Create Account",
            Self::History => "Assessment History",
        }
    }

    /// Only History needs a session.
    #[must_use]
    pub fn requires_session(&self) -> bool {
        matches!(self, Self::History)
    }
}

/// Transitions the shell understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    GoHome,
    GoSignIn,
    GoSignUp,
    GoHistory,
    SignedIn(UserSession),
    SignOut,
}

/// Page router and session holder.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    page: Page,
    session: Option<UserSession>,
}

impl Shell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    #[must_use]
    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// The nav bar is hidden on the auth pages.
    #[must_use]
    pub fn shows_nav_bar(&self) -> bool {
        !matches!(self.page, Page::SignIn | Page::SignUp)
    }

    /// Welcome line for the nav bar, if signed in.
    #[must_use]
    pub fn welcome(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|s| format!("Welcome, {}", s.display_name()))
    }

    /// Apply an event and return the page now shown.
    pub fn dispatch(&mut self, event: NavEvent) -> Page {
        let target = match event {
            NavEvent::GoHome => Page::Home,
            NavEvent::GoSignIn => Page::SignIn,
            NavEvent::GoSignUp => Page::SignUp,
            NavEvent::GoHistory => Page::History,
            NavEvent::SignedIn(session) => {
                tracing::info!("Session started");
                self.session = Some(session);
                Page::Home
            }
            NavEvent::SignOut => {
                tracing::info!("Session ended");
                self.session = None;
                Page::Home
            }
        };

        self.page = if target.requires_session() && self.session.is_none() {
            tracing::debug!("Redirecting to sign-in: {:?} requires a session", target);
            Page::SignIn
        } else {
            target
        };
        self.page
    }
}
