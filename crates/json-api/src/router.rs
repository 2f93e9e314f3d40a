//! App Router

use salvo::Router;

use crate::{admin, auth, books, borrows, lending, orders};

/// The `/api` tree. Everything past the auth middleware requires a valid
/// bearer token; capability checks live in the services.
pub(crate) fn api_router() -> Router {
    Router::with_path("api")
        .push(
            Router::with_path("auth")
                .push(Router::with_path("register").post(auth::register::handler))
                .push(Router::with_path("login").post(auth::login::handler)),
        )
        .push(
            Router::with_path("books")
                .get(books::handlers::index::handler)
                .push(Router::with_path("search").get(books::handlers::search::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(transactions_router())
                .push(
                    Router::with_path("lend")
                        .push(Router::with_path("submit").post(lending::handlers::submit::handler))
                        .push(
                            Router::with_path("user/submissions")
                                .get(lending::handlers::user_index::handler),
                        ),
                )
                .push(admin_router()),
        )
}

fn transactions_router() -> Router {
    Router::with_path("transactions")
        .push(Router::with_path("order").post(orders::handlers::create::handler))
        .push(Router::with_path("borrow").post(borrows::handlers::create::handler))
        .push(
            Router::with_path("user")
                .push(Router::with_path("orders").get(orders::handlers::user_index::handler))
                .push(Router::with_path("borrows").get(borrows::handlers::user_index::handler)),
        )
        .push(
            Router::with_path("admin")
                .push(
                    Router::with_path("orders")
                        .push(Router::with_path("pending").get(orders::handlers::pending::handler))
                        .push(
                            Router::with_path("{order}/ship")
                                .patch(orders::handlers::ship::handler),
                        ),
                )
                .push(
                    Router::with_path("borrows")
                        .push(Router::with_path("active").get(borrows::handlers::active::handler))
                        .push(
                            Router::with_path("{borrow}/status")
                                .patch(borrows::handlers::status::handler),
                        ),
                ),
        )
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .push(
            Router::with_path("lend-submissions")
                .push(Router::with_path("pending").get(lending::handlers::pending::handler))
                .push(
                    Router::with_path("{submission}/{action}")
                        .patch(lending::handlers::review::handler),
                ),
        )
        .push(Router::with_path("summary").get(admin::handlers::summary::handler))
        .push(Router::with_path("users").get(admin::handlers::users::handler))
        .push(Router::with_path("user/{user}").delete(admin::handlers::delete_user::handler))
}
