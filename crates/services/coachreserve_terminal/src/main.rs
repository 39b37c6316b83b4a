// File: services/coachreserve_terminal/src/main.rs
mod commands;
mod render;

use std::sync::Arc;

use coachreserve_app::{App, Route, ToastQueue};
use coachreserve_common::{log_result, Context};
use coachreserve_config::load_config;
use coachreserve_supabase::SupabaseClient;
use commands::Command;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

fn show(app: &App, toasts: &ToastQueue) {
    for notification in toasts.drain() {
        println!("{}", render::toast(&notification));
    }
    println!("{}", render::page(app));
}

fn not_here(route: Route) {
    println!("Commande disponible sur {} uniquement.", route.path());
}

async fn run(app: &mut App, command: Command) {
    match command {
        Command::Help | Command::Quit => {}
        Command::Go(path) => {
            app.navigate(&path).await;
        }
        Command::Back => {
            app.navigate(Route::Landing.path()).await;
        }
        Command::SignOut => {
            app.sign_out().await;
        }
        Command::Callback(url) => {
            if let Err(e) = app.complete_oauth(&url).await {
                debug!(error = %e, "OAuth callback rejected");
            }
        }

        Command::Email(value) => match app.auth() {
            Some(view) => view.set_email(value),
            None => not_here(Route::Auth),
        },
        Command::Password(value) => match app.auth() {
            Some(view) => view.set_password(value),
            None => not_here(Route::Auth),
        },
        Command::Name(value) => match app.auth() {
            Some(view) => view.set_full_name(value),
            None => not_here(Route::Auth),
        },
        Command::SignUp => match app.auth() {
            Some(view) => {
                if let Err(e) = view.sign_up().await {
                    debug!(error = %e, "Sign-up failed");
                }
            }
            None => not_here(Route::Auth),
        },
        Command::SignIn => match app.auth() {
            Some(view) => {
                if let Err(e) = view.sign_in().await {
                    debug!(error = %e, "Sign-in failed");
                }
            }
            None => not_here(Route::Auth),
        },
        Command::OAuth(provider) => match app.auth() {
            Some(view) => match view.sign_in_with_oauth(provider).await {
                Ok(redirect) => {
                    println!("Ouvrez ce lien dans un navigateur :\n{}", redirect.url);
                    println!("Puis collez l'adresse de retour avec : callback <url>");
                }
                Err(e) => debug!(error = %e, "OAuth start failed"),
            },
            None => not_here(Route::Auth),
        },

        Command::Club(n) => {
            let Some(view) = app.booking_mut() else {
                return not_here(Route::Booking);
            };
            match view.wizard().clubs().get(n - 1).map(|club| club.id) {
                Some(id) => {
                    if let Err(e) = view.select_club(id).await {
                        println!("{}", e);
                    }
                }
                None => println!("Pas de club n°{}", n),
            }
        }
        Command::Coach(n) => {
            let Some(view) = app.booking_mut() else {
                return not_here(Route::Booking);
            };
            match view.wizard().coaches().get(n - 1).map(|coach| coach.id) {
                Some(id) => {
                    if let Err(e) = view.select_coach(id).await {
                        println!("{}", e);
                    }
                }
                None => println!("Pas de coach n°{}", n),
            }
        }
        Command::Date(date) => {
            let Some(view) = app.booking_mut() else {
                return not_here(Route::Booking);
            };
            if let Err(e) = view.select_date(date).await {
                debug!(error = %e, "Date refused");
            }
        }
        Command::Book(n) => {
            let Some(view) = app.booking_mut() else {
                return not_here(Route::Booking);
            };
            match view.wizard().slots().get(n - 1).map(|slot| slot.id) {
                Some(id) => {
                    if let Err(e) = view.book(id).await {
                        debug!(error = %e, "Booking failed");
                    }
                }
                None => println!("Pas de créneau n°{}", n),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let config = load_config().expect("Failed to load config");

    // Log to a file so tracing output does not mix with the prompt.
    std::fs::create_dir_all(&config.logging.directory)
        .with_context(|| format!("creating log directory {}", config.logging.directory))
        .expect("Failed to prepare logging");
    let file_appender =
        tracing_appender::rolling::daily(&config.logging.directory, "coachreserve.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    coachreserve_common::init_from_name(&config.logging.level, writer);

    let client = log_result(
        SupabaseClient::from_app_config(&config),
        "Supabase client ready",
        "Failed to create Supabase client",
    )
    .map(Arc::new)
    .expect("Failed to create Supabase client");
    info!(supabase = %client.base_url(), origin = %config.site.origin, "Starting CoachReserve");

    let toasts = ToastQueue::new();
    let mut app = App::builder()
        .from_config(&config)
        .with_auth_service(client.clone())
        .with_booking_store(client)
        .with_notifier(Arc::new(toasts.clone()))
        .build()
        .expect("Failed to build application");

    app.navigate(Route::Landing.path()).await;
    println!("{}", commands::HELP);
    show(&app, &toasts);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match commands::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => {
                println!("{}", commands::HELP);
                continue;
            }
            Ok(Some(command)) => run(&mut app, command).await,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        }
        app.poll().await;
        show(&app, &toasts);
    }

    info!("Terminal closed");
}
