//! Session context and provider
//!
//! The provider owns the [`SessionController`], mirrors its session into
//! component state and runs the startup probe that resumes a session from
//! the refresh cookie.

use std::rc::Rc;
use todo_core::{CancellationToken, Session, SessionController};
use todo_http::client::ClientConfig;
use tracing::debug;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// What views see of the session
#[derive(Clone)]
pub struct SessionContext {
    controller: Rc<SessionController>,
    pub session: Option<Session>,
    /// The startup probe has not finished yet
    pub restoring: bool,
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.controller, &other.controller)
            && self.session == other.session
            && self.restoring == other.restoring
    }
}

impl SessionContext {
    pub fn controller(&self) -> Rc<SessionController> {
        self.controller.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub base_url: AttrValue,
    pub children: Children,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let controller = use_memo(props.base_url.clone(), |base_url| {
        SessionController::new(&ClientConfig::new(base_url.to_string()))
            .map(Rc::new)
            .map_err(|e| e.to_string())
    });
    let session = use_state(|| None::<Session>);
    let restoring = use_state(|| true);

    {
        let controller = controller.clone();
        let session = session.clone();
        let restoring = restoring.clone();
        use_effect_with(props.base_url.clone(), move |_| {
            let cancel = CancellationToken::new();

            match controller.as_ref() {
                Ok(controller) => {
                    spawn_local(mirror_session(
                        controller.clone(),
                        session,
                        cancel.clone(),
                    ));
                    spawn_local(probe_session(controller.clone(), restoring, cancel.clone()));
                }
                Err(_) => restoring.set(false),
            }

            // Unmounting cancels an unfinished probe
            move || cancel.cancel()
        });
    }

    match controller.as_ref() {
        Ok(controller) => {
            let context = SessionContext {
                controller: controller.clone(),
                session: (*session).clone(),
                restoring: *restoring,
            };
            html! {
                <ContextProvider<SessionContext> context={context}>
                    {props.children.clone()}
                </ContextProvider<SessionContext>>
            }
        }
        Err(error) => html! {
            <div class="app-error">
                <h1>{"Could not start"}</h1>
                <p>{error}</p>
            </div>
        },
    }
}

async fn mirror_session(
    controller: Rc<SessionController>,
    session: UseStateHandle<Option<Session>>,
    cancel: CancellationToken,
) {
    let mut updates = controller.subscribe();
    session.set(updates.borrow_and_update().clone());

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                session.set(updates.borrow_and_update().clone());
            }
        }
    }
}

async fn probe_session(
    controller: Rc<SessionController>,
    restoring: UseStateHandle<bool>,
    cancel: CancellationToken,
) {
    match controller.restore(&cancel).await {
        Err(error) if error.is_cancelled() => {
            debug!("Startup probe cancelled");
        }
        _ => restoring.set(false),
    }
}

/// Hook to use the session context
#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
        .expect("SessionContext not found. Make sure to wrap your component with SessionProvider")
}
