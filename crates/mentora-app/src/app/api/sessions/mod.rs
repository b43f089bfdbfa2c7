// Session API handlers.

use salvo::Router;

use crate::app::api::{RECURRING_ROUTE_COMPONENT, SESSIONS_ROUTE_COMPONENT};

mod book;
mod create;
mod list;
mod recurring;


#[must_use]
pub fn routes() -> Router {
    Router::with_path(SESSIONS_ROUTE_COMPONENT)
        .get(list::list_sessions)
        .post(create::create_session)
        .push(
            Router::with_path(RECURRING_ROUTE_COMPONENT)
                .post(recurring::create_recurring)
                .push(Router::with_path("preview").post(recurring::preview_recurring)),
        )
        .push(Router::with_path("{id}/book").post(book::book_session))
}
