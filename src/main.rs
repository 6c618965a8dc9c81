use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use blogdesk::api::{
    notifications::unread_count, ImageUpload, PasswordResetConfirm, Post, PostForm, PostQuery,
    ProfileForm, Registration,
};
use blogdesk::comments::CommentPresenter;
use blogdesk::config::{Cli, Command, Config, PostArgs};
use blogdesk::error::ClientError;
use blogdesk::reconcile::PostInteractions;
use blogdesk::state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match e.downcast_ref::<ClientError>() {
                Some(client_error) => client_error.user_message(),
                None => e.to_string(),
            };
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli)?;
    tracing::debug!("Using API at {}", config.api.base_url);
    let state = AppState::from_config(config)?;
    let api = &state.api;
    let session = &state.session;

    match cli.command {
        Command::Login { username, password } => {
            let logged_in = session.login(api, &username, &password).await?;
            println!("Logged in as {}", username);
            if let Some(user_id) = logged_in.claims().and_then(|c| c.user_id) {
                println!("User id: {}", user_id);
            }
        }
        Command::Logout => {
            session.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => match session.current().await? {
            Some(current) => {
                println!(
                    "Logged in as {}",
                    current.username.as_deref().unwrap_or("(unknown)")
                );
                if let Some(claims) = current.claims() {
                    if let Some(at) = claims.expires_at() {
                        let note = if claims.is_expired(chrono::Utc::now()) {
                            " (expired, run `blogdesk refresh`)"
                        } else {
                            ""
                        };
                        println!("Access token expires {}{}", at.to_rfc3339(), note);
                    }
                }
            }
            None => println!("Not logged in"),
        },
        Command::Refresh => {
            session.refresh(api).await?;
            println!("Access token refreshed");
        }
        Command::Register {
            username,
            email,
            password,
            password2,
        } => {
            api.register(&Registration {
                username,
                email,
                password,
                password2,
            })
            .await?;
            println!("Registration successful! You can now log in.");
        }
        Command::PasswordReset { email } => {
            api.request_password_reset(&email).await?;
            println!("If the address is registered, a reset email is on its way.");
        }
        Command::PasswordResetConfirm {
            uid,
            token,
            new_password,
            re_new_password,
        } => {
            api.confirm_password_reset(&PasswordResetConfirm {
                uid,
                token,
                new_password,
                re_new_password,
            })
            .await?;
            println!("Password reset successful! You can now log in.");
        }
        Command::Posts(args) => {
            let page = args.page.unwrap_or(1);
            let query = PostQuery {
                search: args.search,
                category: args.category,
                tag: args.tag,
                page: args.page,
                page_size: None,
            };
            let results = api.posts().list(&query).await?;
            if results.results.is_empty() {
                println!("No posts found.");
            }
            for post in &results.results {
                print_post_line(post);
            }
            let controls = results.controls(page);
            println!(
                "-- page {}{}{}",
                controls.page,
                controls
                    .previous_page()
                    .map(|p| format!(" | previous: --page {}", p))
                    .unwrap_or_default(),
                controls
                    .next_page()
                    .map(|p| format!(" | next: --page {}", p))
                    .unwrap_or_default(),
            );
        }
        Command::Show { slug } => {
            let post = api.posts().get(&slug).await?;
            print_post_detail(&post);
        }
        Command::Create(args) => {
            let post = api.posts().create(post_form(args).await?).await?;
            println!("Created {}", post.slug);
        }
        Command::Update { slug, post } => {
            api.posts().get_own(&slug).await?;
            let updated = api.posts().update(&slug, post_form(post).await?).await?;
            println!("Updated {}", updated.slug);
        }
        Command::Delete { slug } => {
            api.posts().get_own(&slug).await?;
            api.posts().delete(&slug).await?;
            println!("Deleted {}", slug);
        }
        Command::Like { slug } => {
            let post = api.posts().get(&slug).await?;
            let mut interactions = PostInteractions::from_post(&post);
            let liked = interactions.toggle_like(api).await?;
            println!(
                "{} ({} likes)",
                if liked { "Liked" } else { "Unliked" },
                interactions.likes_count().unwrap_or(0)
            );
        }
        Command::Bookmark { slug } => {
            let post = api.posts().get(&slug).await?;
            let mut interactions = PostInteractions::from_post(&post);
            let bookmarked = interactions.toggle_bookmark(api).await?;
            println!(
                "{}",
                if bookmarked {
                    "Bookmarked"
                } else {
                    "Bookmark removed"
                }
            );
        }
        Command::Comments { slug } => {
            let presenter = comment_presenter(&state, &slug).await?;
            print!("{}", presenter.render().await?);
        }
        Command::Comment {
            slug,
            content,
            reply_to,
        } => {
            let mut presenter = comment_presenter(&state, &slug).await?;
            presenter.post_comment(&content, reply_to).await?;
            print!("{}", presenter.render().await?);
        }
        Command::Uncomment { slug, comment_id } => {
            let mut presenter = comment_presenter(&state, &slug).await?;
            presenter.delete_comment(comment_id).await?;
            print!("{}", presenter.render().await?);
        }
        Command::Taxonomy => {
            let taxonomy = api.taxonomy().await?;
            println!("Categories:");
            for category in &taxonomy.categories {
                println!("  {:>4}  {}", category.id, category.name);
            }
            println!("Tags:");
            for tag in &taxonomy.tags {
                println!("  {:>4}  {}", tag.id, tag.name);
            }
        }
        Command::Notifications { mark_read } => {
            let notifications = api.notifications().await?;
            println!("{} unread", unread_count(&notifications));
            for n in &notifications {
                println!(
                    "{} {}  {}",
                    if n.is_read { " " } else { "*" },
                    n.created_at.format("%Y-%m-%d %H:%M"),
                    n.message
                );
            }
            if mark_read {
                api.mark_all_notifications_read().await?;
                println!("Marked all as read");
            }
        }
        Command::Profile => {
            let profile = api.profile().await?;
            println!("Username: {}", profile.username);
            println!("Email:    {}", profile.email);
            println!("Bio:      {}", profile.bio.as_deref().unwrap_or(""));
            if let Some(picture) = profile.profile_picture {
                println!("Picture:  {}", picture);
            }
        }
        Command::EditProfile { bio, picture } => {
            let current = api.profile().await?;
            let mut form = ProfileForm::from_profile(&current);
            if let Some(bio) = bio {
                form.bio = bio;
            }
            if let Some(path) = picture {
                form.profile_picture = Some(ImageUpload::from_path(&path).await?);
            }
            api.update_profile(form).await?;
            println!("Profile updated");
        }
        Command::Bookmarked => {
            for post in api.posts().bookmarked().await? {
                print_post_line(&post);
            }
        }
        Command::Mine => {
            for post in api.posts().mine().await? {
                print_post_line(&post);
            }
        }
    }

    Ok(())
}

async fn comment_presenter(state: &AppState, slug: &str) -> anyhow::Result<CommentPresenter> {
    let post = state.api.posts().get(slug).await?;
    let mut presenter = CommentPresenter::new(state.api.clone(), post.id);
    presenter.refresh().await?;
    Ok(presenter)
}

async fn post_form(args: PostArgs) -> anyhow::Result<PostForm> {
    let image = match args.image {
        Some(path) => Some(ImageUpload::from_path(&path).await?),
        None => None,
    };
    Ok(PostForm {
        title: args.title,
        content: args.content,
        category: args.category,
        tags: args.tags,
        image,
    })
}

fn print_post_line(post: &Post) {
    println!(
        "{}  {}  by {} on {}",
        post.slug,
        post.title,
        post.author,
        post.created_at.format("%Y-%m-%d")
    );
    println!("    {}...", post.summary());
}

fn print_post_detail(post: &Post) {
    println!("{}", post.title);
    println!(
        "by {} on {}",
        post.author,
        post.created_at.format("%B %-d, %Y")
    );
    if let Some(ref category) = post.category {
        println!("Category: {}", category.name);
    }
    if !post.tags.is_empty() {
        let tags: Vec<&str> = post.tags.iter().map(|t| t.name.as_str()).collect();
        println!("Tags: {}", tags.join(", "));
    }
    if let Some(ref image) = post.image {
        println!("Image: {}", image);
    }
    println!(
        "{} likes{}{}",
        post.likes_count,
        if post.is_liked { " | liked" } else { "" },
        if post.is_bookmarked { " | bookmarked" } else { "" }
    );
    println!();
    println!("{}", post.content);
    println!();
    println!("Last updated: {}", post.updated_at.format("%Y-%m-%d"));
}
