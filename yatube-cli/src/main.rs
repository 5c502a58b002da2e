use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use yatube_client::{
    AuthResponse, Comment, Follow, Group, Listing, NewPost, Post, PostChanges, PostQuery,
    YatubeClient, YatubeClientError,
};

const TOKEN_FILE: &str = ".yatube_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "yatube-cli", version, about = "CLI клиент для yatube-server")]
struct Cli {
    /// Адрес сервера.
    #[arg(long, global = true, env = "YATUBE_SERVER")]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Посты.
    #[command(subcommand)]
    Post(PostCommand),
    /// Комментарии к посту.
    #[command(subcommand)]
    Comment(CommentCommand),
    /// Группы (только чтение).
    #[command(subcommand)]
    Group(GroupCommand),
    /// Подписки текущего пользователя.
    #[command(subcommand)]
    Follow(FollowCommand),
}

#[derive(Debug, Subcommand)]
enum PostCommand {
    /// Список постов.
    List(PostListArgs),
    /// Пост по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Создание поста (требует токен).
    Create {
        #[arg(long)]
        text: String,
        #[arg(long)]
        group: Option<i64>,
    },
    /// Изменение поста (требует токен); не указанные поля не меняются.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, conflicts_with = "clear_group")]
        group: Option<i64>,
        /// Убрать пост из группы.
        #[arg(long)]
        clear_group: bool,
    },
    /// Удаление поста (требует токен).
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Args)]
struct PostListArgs {
    #[arg(long)]
    group: Option<i64>,
    #[arg(long)]
    search: Option<String>,
    /// author, -author, username, -username.
    #[arg(long)]
    ordering: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
}

#[derive(Debug, Subcommand)]
enum CommentCommand {
    /// Комментарии к посту.
    List {
        #[arg(long)]
        post: i64,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Комментарий по id.
    Get {
        #[arg(long)]
        post: i64,
        #[arg(long)]
        id: i64,
    },
    /// Новый комментарий (требует токен).
    Create {
        #[arg(long)]
        post: i64,
        #[arg(long)]
        text: String,
    },
    /// Изменение комментария (требует токен).
    Update {
        #[arg(long)]
        post: i64,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        text: String,
    },
    /// Удаление комментария (требует токен).
    Delete {
        #[arg(long)]
        post: i64,
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum GroupCommand {
    /// Все группы.
    List,
    /// Группа по id.
    Get {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum FollowCommand {
    /// Мои подписки.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Подписаться на автора.
    Create {
        #[arg(long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = normalize_server(cli.server.unwrap_or_else(|| DEFAULT_SERVER.to_string()));
    let mut client = YatubeClient::new(server).map_err(map_client_error)?;

    if let Some(token) = load_token().context("не удалось прочитать .yatube_token")? {
        client.set_token(token);
    }

    match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let auth = client
                .register(&username, &email, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Регистрация успешна", &auth);
        }
        Command::Login { username, password } => {
            let auth = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Вход выполнен", &auth);
        }
        Command::Post(command) => run_post(&client, command).await?,
        Command::Comment(command) => run_comment(&client, command).await?,
        Command::Group(command) => run_group(&client, command).await?,
        Command::Follow(command) => run_follow(&client, command).await?,
    }

    Ok(())
}

async fn run_post(client: &YatubeClient, command: PostCommand) -> Result<()> {
    match command {
        PostCommand::List(args) => {
            let query = PostQuery {
                group: args.group,
                search: args.search,
                ordering: args.ordering,
                limit: args.limit,
                offset: args.offset,
            };
            let list = client.list_posts(&query).await.map_err(map_client_error)?;
            print_listing("Постов", &list, |post| {
                format!("[{}] {} (author={})", post.id, post.text, post.author)
            });
        }
        PostCommand::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            print_post("Пост", &post);
        }
        PostCommand::Create { text, group } => {
            let post = client
                .create_post(&NewPost {
                    text,
                    group,
                    image: None,
                })
                .await
                .map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        PostCommand::Update {
            id,
            text,
            group,
            clear_group,
        } => {
            let changes = PostChanges {
                text,
                group: group_change(group, clear_group),
                image: None,
            };
            let post = client
                .update_post(id, &changes)
                .await
                .map_err(map_client_error)?;
            print_post("Пост обновлён", &post);
        }
        PostCommand::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
    }
    Ok(())
}

async fn run_comment(client: &YatubeClient, command: CommentCommand) -> Result<()> {
    match command {
        CommentCommand::List {
            post,
            limit,
            offset,
        } => {
            let list = client
                .list_comments(post, limit, offset)
                .await
                .map_err(map_client_error)?;
            print_listing("Комментариев", &list, |comment| {
                format!("[{}] {}: {}", comment.id, comment.author, comment.text)
            });
        }
        CommentCommand::Get { post, id } => {
            let comment = client
                .get_comment(post, id)
                .await
                .map_err(map_client_error)?;
            print_comment("Комментарий", &comment);
        }
        CommentCommand::Create { post, text } => {
            let comment = client
                .create_comment(post, &text)
                .await
                .map_err(map_client_error)?;
            print_comment("Комментарий создан", &comment);
        }
        CommentCommand::Update { post, id, text } => {
            let comment = client
                .update_comment(post, id, &text)
                .await
                .map_err(map_client_error)?;
            print_comment("Комментарий обновлён", &comment);
        }
        CommentCommand::Delete { post, id } => {
            client
                .delete_comment(post, id)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий удалён: id={id}");
        }
    }
    Ok(())
}

async fn run_group(client: &YatubeClient, command: GroupCommand) -> Result<()> {
    match command {
        GroupCommand::List => {
            let groups = client.list_groups().await.map_err(map_client_error)?;
            println!("Групп: {}", groups.len());
            for group in &groups {
                println!("- [{}] {} ({})", group.id, group.title, group.slug);
            }
        }
        GroupCommand::Get { id } => {
            let group = client.get_group(id).await.map_err(map_client_error)?;
            print_group(&group);
        }
    }
    Ok(())
}

async fn run_follow(client: &YatubeClient, command: FollowCommand) -> Result<()> {
    match command {
        FollowCommand::List { search } => {
            let follows = client
                .list_follows(search.as_deref())
                .await
                .map_err(map_client_error)?;
            println!("Подписок: {}", follows.len());
            for follow in &follows {
                print_follow(follow);
            }
        }
        FollowCommand::Create { username } => {
            let follow = client.follow(&username).await.map_err(map_client_error)?;
            println!("Подписка оформлена");
            print_follow(&follow);
        }
    }
    Ok(())
}

fn group_change(group: Option<i64>, clear_group: bool) -> Option<Option<i64>> {
    if clear_group {
        return Some(None);
    }
    group.map(Some)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &YatubeClient) -> io::Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn map_client_error(err: YatubeClientError) -> anyhow::Error {
    let message = match err {
        YatubeClientError::Unauthorized => {
            "требуется авторизация: выполните `yatube-cli login ...` или `yatube-cli register ...`"
                .to_string()
        }
        YatubeClientError::Forbidden => "недостаточно прав: изменять можно только своё".to_string(),
        YatubeClientError::NotFound => "ресурс не найден".to_string(),
        YatubeClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        YatubeClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("{title}");
    println!("token: {}", auth.access_token);
    println!("user:");
    println!("  id: {}", auth.user.id);
    println!("  username: {}", auth.user.username);
    println!("  email: {}", auth.user.email);
    println!("  created_at: {}", auth.user.created_at);
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("text: {}", post.text);
    println!("author: {}", post.author);
    println!("pub_date: {}", post.pub_date);
    if let Some(group) = post.group {
        println!("group: {group}");
    }
    if let Some(image) = &post.image {
        println!("image: {image}");
    }
}

fn print_comment(title: &str, comment: &Comment) {
    println!("{title}");
    println!("id: {}", comment.id);
    println!("post: {}", comment.post);
    println!("author: {}", comment.author);
    println!("text: {}", comment.text);
    println!("created: {}", comment.created);
}

fn print_group(group: &Group) {
    println!("id: {}", group.id);
    println!("title: {}", group.title);
    println!("slug: {}", group.slug);
    println!("description: {}", group.description);
}

fn print_follow(follow: &Follow) {
    println!("- {} -> {}", follow.user, follow.following);
}

fn print_listing<T>(label: &str, list: &Listing<T>, line: impl Fn(&T) -> String) {
    match list {
        Listing::Plain(items) => println!("{label}: {}", items.len()),
        Listing::Paged(page) => println!(
            "{label}: {} (limit={}, offset={}, total={})",
            page.results.len(),
            page.limit,
            page.offset,
            page.count
        ),
    }
    for item in list.items() {
        println!("- {}", line(item));
    }
}
