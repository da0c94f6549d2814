//! CLI commands

use anyhow::{Result, bail};
use clap::{Args, Subcommand, builder::NonEmptyStringValueParser};
use todo_core::SessionController;
use todo_http::AuthenticatedTodoClient;
use todo_http::types::{
    OrderDirection, PaginationParams, RegisterRequest, Todo, TodoCreate, TodoFilter, TodoReorder,
    TodoReorderRequest, TodoStatus, TodoUpdate,
};
use tracing::{info, warn};

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Register {
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        username: String,

        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        email: String,

        /// Display name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,

        #[arg(long, env = "TODO_PASSWORD", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
        password: String,
    },

    /// Log in and show the account the token belongs to
    Whoami {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Work with to-do items
    Todos {
        #[command(flatten)]
        credentials: Credentials,

        #[command(subcommand)]
        command: TodoCommands,
    },
}

/// Credentials for commands that need a session
#[derive(Args)]
pub struct Credentials {
    #[arg(long, env = "TODO_USERNAME", value_parser = NonEmptyStringValueParser::new())]
    username: String,

    #[arg(long, env = "TODO_PASSWORD", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    password: String,
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// List items, one page at a time
    List {
        #[arg(long)]
        status: Option<TodoStatus>,

        #[arg(long)]
        bookmarked: Option<bool>,

        /// Only list subtasks of this item
        #[arg(long)]
        parent_id: Option<i64>,

        /// Match titles containing this text
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        page_size: u32,

        #[arg(long)]
        order_by: Option<String>,

        #[arg(long)]
        order_direction: Option<OrderDirection>,
    },

    /// Show a single item with its subtasks
    Show { id: i64 },

    /// Create an item
    Add {
        title: String,

        #[arg(long, default_value = "pending")]
        status: TodoStatus,

        #[arg(long)]
        bookmarked: bool,

        /// Create the item as a subtask
        #[arg(long)]
        parent_id: Option<i64>,
    },

    /// Change an item
    Update {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        status: Option<TodoStatus>,

        #[arg(long)]
        bookmarked: Option<bool>,
    },

    /// Delete an item
    Delete { id: i64 },

    /// Put items in the given order, first id first
    Reorder {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,

        /// Parent of the items when they are subtasks
        #[arg(long)]
        parent_id: Option<i64>,
    },
}

impl Commands {
    pub async fn execute(self, controller: &SessionController) -> Result<()> {
        match self {
            Commands::Register {
                username,
                email,
                name,
                password,
            } => {
                let user = controller
                    .register(&RegisterRequest {
                        username,
                        email,
                        name,
                        password,
                    })
                    .await?;
                println!("Registered {} (id {})", user.username, user.id);
                println!("Log in with: todo whoami --username {}", user.username);
                Ok(())
            }
            Commands::Whoami { credentials } => {
                let session = controller
                    .login(&credentials.username, &credentials.password)
                    .await?;
                println!("Username: {}", session.user.username);
                println!("Name:     {}", session.user.name);
                println!("Email:    {}", session.user.email);
                println!("User id:  {}", session.user.id);
                end_session(controller).await;
                Ok(())
            }
            Commands::Todos {
                credentials,
                command,
            } => {
                controller
                    .login(&credentials.username, &credentials.password)
                    .await?;
                let result = command.execute(controller.api()).await;
                end_session(controller).await;
                result
            }
        }
    }
}

impl TodoCommands {
    pub async fn execute(self, api: &AuthenticatedTodoClient) -> Result<()> {
        match self {
            TodoCommands::List {
                status,
                bookmarked,
                parent_id,
                search,
                page,
                page_size,
                order_by,
                order_direction,
            } => {
                let filter = TodoFilter {
                    status,
                    is_bookmarked: bookmarked,
                    parent_id,
                    search,
                };
                let pagination = PaginationParams {
                    page,
                    page_size,
                    order_by,
                    order_direction,
                };
                let listing = api.list_todos(&filter, &pagination).await?;
                if listing.items.is_empty() {
                    println!("No items");
                }
                for todo in &listing.items {
                    print_todo(todo, 0);
                }
                println!(
                    "Page {} of {} ({} items)",
                    listing.page,
                    page_count(listing.total_count, listing.page_size),
                    listing.total_count
                );
                Ok(())
            }
            TodoCommands::Show { id } => {
                let todo = api.get_todo(id).await?;
                print_todo(&todo, 0);
                Ok(())
            }
            TodoCommands::Add {
                title,
                status,
                bookmarked,
                parent_id,
            } => {
                let todo = api
                    .create_todo(&TodoCreate {
                        title,
                        status,
                        is_bookmarked: bookmarked,
                        parent_id,
                    })
                    .await?;
                info!(id = todo.id, "Created item");
                println!("Created #{}", todo.id);
                Ok(())
            }
            TodoCommands::Update {
                id,
                title,
                status,
                bookmarked,
            } => {
                if title.is_none() && status.is_none() && bookmarked.is_none() {
                    bail!("Nothing to update; pass --title, --status or --bookmarked");
                }
                let todo = api
                    .update_todo(
                        id,
                        &TodoUpdate {
                            title,
                            status,
                            is_bookmarked: bookmarked,
                            parent_id: None,
                        },
                    )
                    .await?;
                print_todo(&todo, 0);
                Ok(())
            }
            TodoCommands::Delete { id } => {
                api.delete_todo(id).await?;
                println!("Deleted #{id}");
                Ok(())
            }
            TodoCommands::Reorder { ids, parent_id } => {
                let request = TodoReorderRequest {
                    reorders: reorders_for(&ids),
                    parent_id,
                };
                for todo in api.reorder_todos(&request).await? {
                    print_todo(&todo, 0);
                }
                Ok(())
            }
        }
    }
}

/// Revoke the refresh cookie; the command's own result takes precedence
async fn end_session(controller: &SessionController) {
    if let Err(e) = controller.logout().await {
        warn!("Could not log out: {e}");
    }
}

fn print_todo(todo: &Todo, depth: usize) {
    let indent = "  ".repeat(depth);
    let bookmark = if todo.is_bookmarked { " *" } else { "" };
    println!(
        "{indent}#{:<5} [{:<11}] {}{bookmark}",
        todo.id,
        todo.status.label(),
        todo.title
    );
    for subtask in &todo.subtasks {
        print_todo(subtask, depth + 1);
    }
}

fn reorders_for(ids: &[i64]) -> Vec<TodoReorder> {
    ids.iter()
        .zip(0..)
        .map(|(&todo_id, new_order)| TodoReorder { todo_id, new_order })
        .collect()
}

fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}
