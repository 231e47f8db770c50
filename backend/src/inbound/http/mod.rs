//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod error;
pub mod health;
pub mod messages;
pub mod posts;
pub mod posts_dto;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// Extractor failures are reported as `invalid_request` domain errors.
/// Callers mount this inside the versioned scope and wrap that scope in the
/// session middleware; [`state::HttpState`] must be available as app data.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use circle::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// # drop(app);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(accounts::signup)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::me)
        .service(users::search_users)
        .service(users::get_profile)
        .service(users::toggle_follow)
        .service(users::list_followers)
        .service(users::list_following)
        .service(posts::create_post)
        .service(posts::list_feed)
        .service(posts::my_posts)
        .service(posts::toggle_like)
        .service(posts::add_comment)
        .service(posts::delete_comment)
        .service(posts::record_view)
        .service(posts::delete_post)
        .service(messages::send_message)
        // Literal segment before the `{user_id}` capture.
        .service(messages::list_conversations)
        .service(messages::list_messages)
        .service(messages::mark_read)
        .service(messages::delete_conversation);
}
