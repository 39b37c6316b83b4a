// --- File: crates/services/coachreserve_terminal/src/render.rs ---
//! Plain-text rendering of the current page and of pending toasts.

use std::fmt::Write;

use coachreserve_app::messages;
use coachreserve_app::views::landing::features;
use coachreserve_app::views::{AuthView, BookingView, LandingView};
use coachreserve_app::{App, Notification, NotificationLevel, Route};
use coachreserve_common::models::OAuthProvider;

pub fn page(app: &App) -> String {
    match app.route() {
        Route::Landing => app.landing().map(landing).unwrap_or_default(),
        Route::Auth => app.auth().map(auth).unwrap_or_default(),
        Route::Booking => app.booking().map(booking).unwrap_or_default(),
    }
}

fn landing(view: &LandingView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", messages::APP_NAME);
    let _ = writeln!(out, "{}", messages::TAGLINE);
    if let Some(user) = view.user() {
        let _ = writeln!(out, "Bonjour {}", user.greeting_name());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", messages::FEATURES_TITLE);
    let _ = writeln!(out, "{}", messages::FEATURES_SUBTITLE);
    for feature in features() {
        let _ = writeln!(out, "  * {}: {}", feature.title, feature.description);
    }
    let _ = writeln!(out);

    let primary = view.primary_action();
    let _ = writeln!(out, "[{}] go {}", primary.label, primary.route.path());
    if let Some(secondary) = view.secondary_action() {
        let _ = writeln!(out, "[{}] go {}", secondary.label, secondary.route.path());
    }
    if let Some(cta) = view.signup_cta() {
        let _ = writeln!(out, "{} {}", messages::CTA_TITLE, messages::CTA_TEXT);
        let _ = writeln!(out, "[{}] go {}", cta.label, cta.route.path());
    }
    out
}

fn auth(view: &AuthView) -> String {
    let form = view.form();
    let mut out = String::new();
    let _ = writeln!(out, "== Connexion / Inscription ==");
    let _ = writeln!(out, "email: {}", form.email);
    let _ = writeln!(
        out,
        "password: {}",
        if form.password.is_empty() { "" } else { "******" }
    );
    let _ = writeln!(out, "name: {}", form.full_name);
    let _ = writeln!(out, "signup | signin");
    for provider in OAuthProvider::ALL {
        let _ = writeln!(
            out,
            "[{}] oauth {}",
            messages::oauth_button(provider),
            provider.as_str()
        );
    }
    out
}

fn booking(view: &BookingView) -> String {
    let wizard = view.wizard();
    let mut out = String::new();
    let _ = writeln!(out, "== Réserver une séance ==");

    let _ = writeln!(out, "Clubs:");
    for (i, club) in wizard.clubs().iter().enumerate() {
        let mark = if wizard.selected_club() == Some(club.id) { '>' } else { ' ' };
        let _ = writeln!(out, " {}{}. {}", mark, i + 1, club.label());
    }

    if wizard.selected_club().is_some() {
        let _ = writeln!(out, "Coachs:");
        for (i, coach) in wizard.coaches().iter().enumerate() {
            let mark = if wizard.selected_coach() == Some(coach.id) { '>' } else { ' ' };
            let _ = writeln!(out, " {}{}. {}", mark, i + 1, coach.label());
        }
    }

    if let Some(heading) = view.slot_heading() {
        let _ = writeln!(out, "Créneaux du {}:", heading);
        for (i, slot) in wizard.slots().iter().enumerate() {
            let coach = slot.coach_label().unwrap_or_default();
            let _ = writeln!(out, "  {}. {} {}", i + 1, slot.time_range(), coach);
        }
        if let Some(empty) = view.empty_message() {
            let _ = writeln!(out, "  {}", empty);
        }
    }
    let _ = writeln!(out, "club <n> | coach <n> | date <YYYY-MM-DD> | book <n> | signout | back");
    out
}

pub fn toast(notification: &Notification) -> String {
    let marker = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "!!",
    };
    format!("[{}] {}", marker, notification.message)
}
