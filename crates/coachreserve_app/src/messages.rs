//! User-facing French texts.

use chrono::{Datelike, NaiveDate, Weekday};
use coachreserve_common::models::OAuthProvider;

pub const APP_NAME: &str = "CoachReserve";

// Auth
pub const SIGN_UP_SUCCESS: &str =
    "Inscription réussie ! Vérifiez vos emails pour confirmer votre compte.";
pub const SIGN_UP_FAILED: &str = "Une erreur est survenue lors de l'inscription.";
pub const SIGN_IN_SUCCESS: &str = "Connexion réussie !";
pub const SIGN_IN_FAILED: &str = "Erreur lors de la connexion.";
pub const SIGN_OUT_FAILED: &str = "Erreur lors de la déconnexion";
pub const FIELDS_REQUIRED: &str = "Veuillez remplir tous les champs.";
pub const FULL_NAME_REQUIRED: &str = "Veuillez indiquer votre nom complet.";
pub const PASSWORD_TOO_SHORT: &str = "Le mot de passe doit contenir au moins 6 caractères.";
pub const ACTION_IN_PROGRESS: &str = "Une action est déjà en cours.";

// Booking
pub const CLUBS_LOAD_FAILED: &str = "Erreur lors du chargement des clubs";
pub const COACHES_LOAD_FAILED: &str = "Erreur lors du chargement des coachs";
pub const SLOTS_LOAD_FAILED: &str = "Erreur lors du chargement des créneaux";
pub const BOOKING_SUCCESS: &str = "Réservation confirmée!";
pub const BOOKING_FAILED: &str = "Erreur lors de la réservation";
pub const BOOKING_CONFLICT: &str = "Ce créneau vient d'être réservé par un autre client.";
pub const NO_SLOTS: &str = "Aucun créneau disponible pour cette date";
pub const DATE_IN_PAST: &str = "Impossible de choisir une date passée.";
pub const SESSION_EXPIRED: &str = "Votre session a expiré, veuillez vous reconnecter.";

// Landing
pub const TAGLINE: &str =
    "La plateforme moderne pour gérer et réserver vos séances de coaching sportif";
pub const FEATURES_TITLE: &str = "Pourquoi choisir CoachReserve ?";
pub const FEATURES_SUBTITLE: &str = "Une solution complète pour tous vos besoins en coaching";
pub const CTA_TITLE: &str = "Prêt à commencer votre transformation ?";
pub const CTA_TEXT: &str =
    "Rejoignez des milliers d'athlètes qui utilisent CoachReserve pour atteindre leurs objectifs";
pub const CTA_SIGN_UP: &str = "Créer un compte gratuitement";
pub const ACTION_BOOK: &str = "Réserver une séance";
pub const ACTION_START: &str = "Commencer";
pub const ACTION_SIGN_IN: &str = "Se connecter";

/// Marketing feature blurbs as (title, description).
pub const FEATURES: [(&str, &str); 3] = [
    (
        "Réservation simple",
        "Réservez vos créneaux de coaching en quelques clics",
    ),
    (
        "Coachs qualifiés",
        "Choisissez parmi une sélection de coachs professionnels",
    ),
    (
        "Disponibilité en temps réel",
        "Consultez les créneaux disponibles instantanément",
    ),
];

/// Text shown when an OAuth sign-in cannot start. Always names the provider
/// by its id (`google`, `facebook`, `apple`).
pub fn oauth_failed(provider: OAuthProvider, provider_message: Option<&str>) -> String {
    let base = format!("Erreur lors de la connexion avec {}", provider.as_str());
    match provider_message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => format!("{} : {}", base, message),
        None => base,
    }
}

/// `"Continuer avec Google"`
pub fn oauth_button(provider: OAuthProvider) -> String {
    format!("Continuer avec {}", provider.display_name())
}

fn weekday_fr(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lundi",
        Weekday::Tue => "mardi",
        Weekday::Wed => "mercredi",
        Weekday::Thu => "jeudi",
        Weekday::Fri => "vendredi",
        Weekday::Sat => "samedi",
        Weekday::Sun => "dimanche",
    }
}

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Long French date, e.g. `"lundi 10 juin 2024"`.
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        weekday_fr(date.weekday()),
        date.day(),
        MONTHS_FR[date.month0() as usize],
        date.year()
    )
}
