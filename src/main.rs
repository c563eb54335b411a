//! SM-Clone command-line client.
//!
//! Runs one operation against the SM-Clone API per invocation, keeping the
//! session in a local snapshot file between runs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sm_client::models::{FriendRef, Post, User};
use sm_client::notify::{drain, Level, Notifications};
use sm_client::validation::{LoginForm, RegisterForm};
use sm_client::{ClientError, Config, SessionStore, SocialClient};

#[derive(Parser)]
#[command(name = "sm-client")]
#[command(version)]
#[command(about = "SM-Clone social network client")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Session snapshot file (default: SM_SESSION_PATH)
    #[arg(long, value_name = "PATH")]
    session: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        occupation: String,
        /// Profile picture to upload first
        #[arg(long, value_name = "PATH")]
        picture: Option<PathBuf>,
    },
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Toggle light/dark mode
    Mode,
    /// Show the feed
    Feed,
    /// Show a user's profile and timeline
    Profile { user_id: String },
    /// Publish a post
    Post {
        description: String,
        /// Image to attach
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Like or unlike a post
    Like { post_id: String },
    /// Comment on a post
    Comment { post_id: String, text: String },
    /// Show a friend list (default: your own)
    Friends { user_id: Option<String> },
    /// Add or remove a friend
    ToggleFriend { friend_id: String },
    /// Search users by name
    Search { text: String },
    /// Upload an image and print its URL
    Upload { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(path) = cli.session {
        config.session_path = path;
    }

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("User API: {}", config.api_user);
    tracing::debug!("Post API: {}", config.api_post);
    tracing::debug!("Session file: {:?}", config.session_path);

    let store = SessionStore::open(&config.session_path);
    let (client, mut notifications) = SocialClient::new(config, store)?;

    let result = run(&client, cli.command).await;

    print_notifications(&mut notifications);
    if let Err(ClientError::Validation(errors)) = &result {
        for (field, message) in errors.iter() {
            eprintln!("  {}: {}", field, message);
        }
    }

    // let a scheduled redirect happen before exiting
    if client.navigator().has_pending() {
        client.navigator().wait_pending().await;
    }
    tracing::debug!("Route: {}", client.navigator().current());

    result.map_err(Into::into)
}

async fn run(client: &SocialClient, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
            location,
            occupation,
            picture,
        } => {
            let picture_path = match picture {
                Some(path) => client.upload_image(&path).await?,
                None => String::new(),
            };
            let form = RegisterForm {
                first_name,
                last_name,
                email,
                password,
                confirm_password,
                picture_path,
                location,
                occupation,
            };
            client.register(form).await?;
        }
        Command::Login { email, password } => {
            let user = client.login(LoginForm { email, password }).await?;
            print_user(&user);
        }
        Command::Logout => {
            client.logout().await?;
        }
        Command::Whoami => match client.store().user() {
            Some(user) => print_user(&user),
            None => println!("Not signed in"),
        },
        Command::Mode => {
            println!("Mode: {}", client.toggle_mode().as_str());
        }
        Command::Feed => {
            let posts = client.feed().await?;
            print_posts(client, &posts);
        }
        Command::Profile { user_id } => {
            let user = client.get_user(&user_id).await?;
            print_user(&user);
            let posts = client.user_posts(&user_id).await?;
            print_posts(client, &posts);
        }
        Command::Post { description, image } => {
            let picture_path = match image {
                Some(path) => Some(client.upload_image(&path).await?),
                None => None,
            };
            client.create_post(&description, picture_path).await?;
            print_posts(client, &client.store().posts());
        }
        Command::Like { post_id } => {
            let post = client.like(&post_id).await?;
            print_posts(client, std::slice::from_ref(&post));
        }
        Command::Comment { post_id, text } => {
            let post = client.comment(&post_id, &text).await?;
            print_posts(client, std::slice::from_ref(&post));
        }
        Command::Friends { user_id } => {
            let user_id = match user_id.or_else(|| client.store().user().map(|u| u.id)) {
                Some(id) => id,
                None => return Err(client.gateway().reject(ClientError::NotAuthenticated)),
            };
            let friends = client.friend_list(&user_id).await?;
            print_friends(&friends);
        }
        Command::ToggleFriend { friend_id } => {
            let friends = client.toggle_friend(&friend_id).await?;
            print_friends(&friends);
        }
        Command::Search { text } => {
            let search = client.user_search();
            search.set_query(&text).await?;
            print_friends(&search.state().results);
        }
        Command::Upload { path } => {
            println!("{}", client.upload_image(&path).await?);
        }
    }
    Ok(())
}

fn print_notifications(rx: &mut Notifications) {
    for notification in drain(rx) {
        let tag = match notification.level {
            Level::Success => "ok",
            Level::Info => "info",
            Level::Error => "error",
        };
        eprintln!("[{}] {}", tag, notification.message);
    }
}

fn print_user(user: &User) {
    println!("{} <{}> ({})", user.full_name(), user.email, user.id);
    if !user.location.is_empty() {
        println!("  location: {}", user.location);
    }
    if !user.occupation.is_empty() {
        println!("  occupation: {}", user.occupation);
    }
    println!("  {} friends", user.friends.len());
}

fn print_friends(friends: &[FriendRef]) {
    if friends.is_empty() {
        println!("No results...");
    }
    for friend in friends {
        println!("{:<26} {} ({})", friend.id, friend.full_name(), friend.occupation);
    }
}

fn print_posts(client: &SocialClient, posts: &[Post]) {
    let viewer = client.store().user().map(|u| u.id).unwrap_or_default();
    for post in posts {
        let heart = if post.is_liked_by(&viewer) { "♥" } else { "♡" };
        println!("[{}] {}", post.id, post.user.full_name());
        println!("  {}", post.description);
        if let Some(picture) = &post.picture_path {
            println!("  {}", picture);
        }
        println!(
            "  {} {}  {} comments",
            heart,
            post.like_count(),
            post.comments.len()
        );
        for comment in &post.comments {
            println!("    {}: {}", comment.author_name(), comment.comment);
        }
    }
}
