use super::{bind_input, error_banner};
use crate::auth::use_session;
use crate::error_messages::{client_error, session_error};
use todo_http::types::{
    PaginatedResponse, PaginationParams, Todo, TodoCreate, TodoFilter, TodoStatus, TodoUpdate,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
struct TodoRowProps {
    todo: Todo,
    on_status: Callback<(i64, TodoStatus)>,
    on_bookmark: Callback<(i64, bool)>,
    on_delete: Callback<i64>,
}

#[function_component(TodoRow)]
fn todo_row(props: &TodoRowProps) -> Html {
    let todo = &props.todo;
    let id = todo.id;

    let onchange = {
        let on_status = props.on_status.clone();
        Callback::from(move |event: Event| {
            let value = event.target_unchecked_into::<HtmlSelectElement>().value();
            if let Ok(status) = value.parse::<TodoStatus>() {
                on_status.emit((id, status));
            }
        })
    };
    let bookmarked = todo.is_bookmarked;
    let on_bookmark = props.on_bookmark.reform(move |_: MouseEvent| (id, !bookmarked));
    let on_delete = props.on_delete.reform(move |_: MouseEvent| id);

    html! {
        <li class={classes!("todo", todo.status.as_str())}>
            <span class="title">{ todo.title.clone() }</span>
            <select {onchange}>
                { for TodoStatus::ALL.iter().map(|status| html! {
                    <option value={status.as_str()} selected={*status == todo.status}>
                        { status.label() }
                    </option>
                }) }
            </select>
            <button class="bookmark" onclick={on_bookmark}>
                { if bookmarked { "Unbookmark" } else { "Bookmark" } }
            </button>
            <button class="delete" onclick={on_delete}>{"Delete"}</button>
            if !todo.subtasks.is_empty() {
                <ul class="subtasks">
                    { for todo.subtasks.iter().map(|subtask| html! {
                        <li class={classes!("todo", subtask.status.as_str())}>
                            { subtask.title.clone() }
                        </li>
                    }) }
                </ul>
            }
        </li>
    }
}

#[function_component(TodosPage)]
pub fn todos_page() -> Html {
    let session = use_session();
    let controller = session.controller();
    let listing = use_state(|| None::<PaginatedResponse<Todo>>);
    let page = use_state(|| 1_u32);
    // Bumped after every change to refetch the current page
    let revision = use_state(|| 0_u32);
    let new_title = use_state(String::new);
    let error = use_state(|| None::<String>);

    {
        let controller = controller.clone();
        let listing = listing.clone();
        let error = error.clone();
        use_effect_with((*page, *revision), move |&(page, _)| {
            spawn_local(async move {
                let pagination = PaginationParams {
                    page,
                    ..PaginationParams::default()
                };
                match controller
                    .api()
                    .list_todos(&TodoFilter::default(), &pagination)
                    .await
                {
                    Ok(response) => listing.set(Some(response)),
                    Err(e) => error.set(Some(client_error(&e))),
                }
            });
        });
    }

    let reload = {
        let revision = revision.clone();
        let error = error.clone();
        move || {
            error.set(None);
            revision.set(*revision + 1);
        }
    };

    let on_add = {
        let controller = controller.clone();
        let new_title = new_title.clone();
        let error = error.clone();
        let reload = reload.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let todo = TodoCreate {
                title: new_title.trim().to_string(),
                ..TodoCreate::default()
            };
            let controller = controller.clone();
            let new_title = new_title.clone();
            let error = error.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match controller.api().create_todo(&todo).await {
                    Ok(_) => {
                        new_title.set(String::new());
                        reload();
                    }
                    Err(e) => error.set(Some(client_error(&e))),
                }
            });
        })
    };

    let update = {
        let controller = controller.clone();
        let error = error.clone();
        let reload = reload.clone();
        move |id: i64, update: TodoUpdate| {
            let controller = controller.clone();
            let error = error.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match controller.api().update_todo(id, &update).await {
                    Ok(_) => reload(),
                    Err(e) => error.set(Some(client_error(&e))),
                }
            });
        }
    };

    let on_status = {
        let update = update.clone();
        Callback::from(move |(id, status): (i64, TodoStatus)| {
            update(
                id,
                TodoUpdate {
                    status: Some(status),
                    ..TodoUpdate::default()
                },
            );
        })
    };

    let on_bookmark = Callback::from(move |(id, bookmarked): (i64, bool)| {
        update(
            id,
            TodoUpdate {
                is_bookmarked: Some(bookmarked),
                ..TodoUpdate::default()
            },
        );
    });

    let on_delete = {
        let controller = controller.clone();
        let error = error.clone();
        Callback::from(move |id: i64| {
            let controller = controller.clone();
            let error = error.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match controller.api().delete_todo(id).await {
                    Ok(()) => reload(),
                    Err(e) => error.set(Some(client_error(&e))),
                }
            });
        })
    };

    let on_logout = {
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            let controller = controller.clone();
            let error = error.clone();
            spawn_local(async move {
                // The route guard takes over once the session is gone
                if let Err(e) = controller.logout().await {
                    error.set(Some(session_error(&e)));
                }
            });
        })
    };

    let page_controls = (*listing).as_ref().map_or_else(
        || html! {},
        |listing| {
            let pages = listing.total_count.div_ceil(u64::from(listing.page_size.max(1)));
            let previous = {
                let page = page.clone();
                Callback::from(move |_: MouseEvent| page.set((*page).saturating_sub(1).max(1)))
            };
            let next = {
                let page = page.clone();
                Callback::from(move |_: MouseEvent| page.set(*page + 1))
            };
            html! {
                <nav class="pagination">
                    <button onclick={previous} disabled={*page <= 1}>{"Previous"}</button>
                    <span>{ format!("Page {} of {}", listing.page, pages.max(1)) }</span>
                    <button onclick={next} disabled={u64::from(*page) >= pages}>{"Next"}</button>
                </nav>
            }
        },
    );

    html! {
        <main class="todos-page">
            <header>
                <h1>{"To-do"}</h1>
                if let Some(current) = session.session.as_ref() {
                    <span class="user">{ current.user.name.clone() }</span>
                }
                <button onclick={on_logout}>{"Log out"}</button>
            </header>
            <form class="new-todo" onsubmit={on_add}>
                <input type="text" placeholder="What needs doing?"
                    value={(*new_title).clone()} oninput={bind_input(&new_title)} />
                <button type="submit">{"Add"}</button>
            </form>
            { error_banner((*error).as_ref()) }
            {
                match (*listing).as_ref() {
                    None => html! { <p>{"Loading..."}</p> },
                    Some(listing) if listing.items.is_empty() => html! { <p>{"Nothing to do."}</p> },
                    Some(listing) => html! {
                        <ul class="todos">
                            { for listing.items.iter().map(|todo| html! {
                                <TodoRow
                                    key={todo.id}
                                    todo={todo.clone()}
                                    on_status={on_status.clone()}
                                    on_bookmark={on_bookmark.clone()}
                                    on_delete={on_delete.clone()}
                                />
                            }) }
                        </ul>
                    },
                }
            }
            { page_controls }
        </main>
    }
}
