//! Terminal rendering of [`AppSnapshot`] sections.

use colored::Colorize;
use snacksy_application::AppSnapshot;
use snacksy_core::{FeatureError, FeatureState};

pub fn header() {
    println!("{}", "=== Snacksy ===".bright_magenta().bold());
}

pub fn session(snapshot: &AppSnapshot) {
    match snapshot.welcome_line() {
        Some(line) => println!("{}", line.bright_green()),
        None if snapshot.sign_in_available => {
            println!("{}", "Not signed in. Type 'signin' to sign in with Google.".bright_black())
        }
        None => println!(
            "{}",
            "Not signed in. Google sign-in is not configured (missing client id).".yellow()
        ),
    }
    if let Some(err) = &snapshot.auth_error {
        println!("{}", format!("Authentication Error: {}", err).red());
    }
}

pub fn tagging(snapshot: &AppSnapshot) {
    println!("{}", "Food Image".bright_cyan().bold());
    match &snapshot.pending_file {
        Some(name) => println!("  Selected: {}", name),
        None => println!("  {}", "No image selected.".bright_black()),
    }

    if snapshot.uploading && snapshot.tagging != FeatureState::Loading {
        println!("  {}", "Loading tags...".yellow());
    }
    match &snapshot.tagging {
        FeatureState::Idle => {}
        FeatureState::Loading => println!("  {}", "Loading tags...".yellow()),
        FeatureState::Failed(err) => println!("  {}", error_line(err).red()),
        FeatureState::Ready { items, notice } => {
            if let Some(notice) = notice {
                println!("  {}", notice.yellow());
            }
            if !items.is_empty() {
                println!("  Detected Tags:");
                for tag in items {
                    println!("    - {}", tag.bright_white());
                }
            }
        }
    }
}

pub fn activity(snapshot: &AppSnapshot) {
    println!("{}", "Your YouTube Activity".bright_cyan().bold());
    match &snapshot.activity {
        FeatureState::Idle => {}
        FeatureState::Loading => println!("  {}", "Loading YouTube activity...".yellow()),
        FeatureState::Failed(err) => println!("  {}", error_line(err).red()),
        FeatureState::Ready { notice, .. } => {
            if let Some(notice) = notice {
                println!("  {}", notice.bright_black());
            }
            let rows = snapshot.liked_videos();
            if !rows.is_empty() {
                println!("  My Liked Videos:");
            }
            for row in rows {
                println!("    {}", row.title.bold());
                println!("      {}", row.url.underline());
                println!("      Channel: {}", row.channel);
                println!("      Duration: {} | Views: {}", row.duration, row.views);
                if let Some(thumbnail) = &row.thumbnail {
                    println!("      Thumbnail: {}", thumbnail.bright_black());
                }
            }
        }
    }
}

pub fn recommendations(snapshot: &AppSnapshot) {
    println!("{}", "Video Recommendations".bright_cyan().bold());
    match &snapshot.recommendations {
        FeatureState::Loading => println!("  {}", "Fetching recommendations...".yellow()),
        FeatureState::Failed(err) => println!("  {}", error_line(err).red()),
        FeatureState::Idle | FeatureState::Ready { .. } => {
            let cards = snapshot.recommendation_cards();
            if !cards.is_empty() {
                println!("  Recommended Videos:");
            }
            for card in cards {
                println!("    {}", card.title.bold());
                println!("      {}", card.url.underline());
                println!("      Reason: {}", card.reason);
            }
            if let Some(hint) = snapshot.recommendations_hint() {
                println!("  {}", hint.bright_black());
            }
        }
    }
}

pub fn all(snapshot: &AppSnapshot) {
    session(snapshot);
    println!();
    tagging(snapshot);
    println!();
    activity(snapshot);
    println!();
    recommendations(snapshot);
}

/// `Error: <message>`, without doubling a prefix the message already has.
pub fn error_line(err: &FeatureError) -> String {
    let message = err.message();
    if message.starts_with("Error:") {
        message
    } else {
        format!("Error: {}", message)
    }
}

pub fn info(message: &str) {
    println!("{}", message.bright_black());
}

pub fn failure(message: &str) {
    eprintln!("{}", message.red());
}
