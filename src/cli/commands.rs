use std::io::{self, BufRead};

use crate::app::{AppContext, MurmurError, Result};
use crate::domain::{PostId, UserId};
use crate::feed::{FeedController, FeedStatus, PostAction, PostViewModel};
use crate::profile::ProfileStatus;
use crate::session::{Route, Router};

pub async fn login(ctx: &AppContext, username: &str, password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => read_password()?,
    };

    let mut screen = ctx.login_screen();
    screen.submit(username, &password).await?;
    println!("Signed in as {}", username);
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout()?;
    println!("Signed out");
    Ok(())
}

pub fn status(ctx: &AppContext) -> Result<()> {
    if ctx.session.is_authenticated() {
        println!("Signed in ({})", ctx.config.api.base_url);
    } else {
        println!("Not signed in");
    }
    Ok(())
}

pub async fn list_feed(ctx: &AppContext) -> Result<()> {
    let Some(feed) = mounted_feed(ctx).await else {
        return Ok(());
    };

    if feed.items().is_empty() {
        println!("No posts");
        return Ok(());
    }

    for post in feed.items() {
        print_post(post);
    }
    Ok(())
}

pub async fn act(ctx: &AppContext, post_id: PostId, action: PostAction) -> Result<()> {
    let Some(feed) = mounted_feed(ctx).await else {
        return Ok(());
    };
    let post = feed
        .post(post_id)
        .cloned()
        .ok_or(MurmurError::PostNotFound(post_id))?;

    let mut detail = ctx.post_detail(post);
    if !detail.mount() {
        report_redirect(ctx);
        return Ok(());
    }

    match detail.dispatch(action).await {
        Ok(_) => print_post(detail.post()),
        Err(MurmurError::Api(e)) => {
            eprintln!("{}", e.user_message());
            report_redirect(ctx);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

pub async fn show_profile(ctx: &AppContext, user_id: UserId) -> Result<()> {
    ctx.router.navigate(Route::Profile(user_id));
    let mut screen = ctx.profile(user_id);
    screen.mount().await;

    match screen.status() {
        ProfileStatus::Ready(profile) => {
            println!("{} (#{})", profile.display_name, profile.id);
            if let Some(followers) = profile.followers_count {
                println!("  {} followers", followers);
            }
            if !profile.bio.is_empty() {
                println!("  {}", profile.bio);
            }
        }
        ProfileStatus::Failed(reason) => eprintln!("{}", reason),
        ProfileStatus::Loading => {}
    }
    report_redirect(ctx);
    Ok(())
}

/// Mounts a feed screen. `None` when there is nothing to show.
async fn mounted_feed(ctx: &AppContext) -> Option<FeedController> {
    ctx.router.navigate(Route::Feed);
    let mut feed = ctx.feed();
    feed.mount().await;

    match feed.status() {
        FeedStatus::Ready => Some(feed),
        FeedStatus::Failed(reason) => {
            eprintln!("{}", reason);
            report_redirect(ctx);
            None
        }
        FeedStatus::Loading => {
            report_redirect(ctx);
            None
        }
    }
}

fn print_post(post: &PostViewModel) {
    let liked = if post.is_liked_by_viewer() { "♥" } else { "♡" };
    let follow = match (post.is_following_author(), post.author_followers_count()) {
        (true, Some(count)) => format!(" (following, {} followers)", count),
        (true, None) => " (following)".to_string(),
        (false, Some(count)) => format!(" ({} followers)", count),
        (false, None) => String::new(),
    };
    println!("[{}] {}", post.id, post.display_title());
    println!(
        "  by {}{}  {} {}  {} comments",
        post.author.display_name,
        follow,
        liked,
        post.like_count(),
        post.comments().len()
    );
    if let Some(notice) = post.notice() {
        println!("  ! {}", notice);
    }
}

fn report_redirect(ctx: &AppContext) {
    if ctx.router.current() == Some(Route::Login) {
        println!("Not signed in. Run `murmur login <username>` first.");
    }
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
