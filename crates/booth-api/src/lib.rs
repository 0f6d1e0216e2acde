pub mod auth;
pub mod bookings;
pub mod booths;
pub mod error;
pub mod extract;
pub mod media;
pub mod scores;
pub mod state;
pub mod subjects;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// All REST routes, mounted under `/api/v1`. Collection roots answer with
/// and without a trailing slash; existing clients call the slash form.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // -- Users --
        .route("/user", post(users::register))
        .route("/user/", post(users::register))
        .route("/user/{user_id}", get(users::get_user))
        .route("/user/{user_id}/exist", get(users::user_exists))
        .route("/user/{user_id}/total_score", get(users::total_score))
        // -- Booths --
        .route("/booth", get(booths::list_booths))
        .route("/booth/", get(booths::list_booths))
        .route("/booth/new", post(booths::create_booth))
        .route("/booth/edit", post(booths::edit_booth))
        .route("/booth/auth", post(auth::auth_booth))
        .route("/booth/image", post(media::add_image))
        .route("/booth/video", post(media::add_video))
        .route(
            "/booth/congestion/{booth_id}",
            get(booths::get_congestion).post(booths::update_congestion),
        )
        .route("/booth/{booth_id}", get(booths::get_booth))
        .route("/booth/{booth_id}/image", get(media::list_images))
        .route("/booth/{booth_id}/video", get(media::list_videos))
        // -- Bookings --
        .route("/booth/book/u/{user_id}", get(bookings::list_for_user))
        .route("/booth/book/{booth_id}", get(bookings::list_for_booth))
        .route(
            "/booth/book/{booth_id}/{period}",
            get(bookings::list_for_slot)
                .post(bookings::book)
                .delete(bookings::cancel),
        )
        // -- Subjects --
        .route("/subject", get(subjects::list_subjects).post(subjects::create_subject))
        .route("/subject/", get(subjects::list_subjects).post(subjects::create_subject))
        .route(
            "/subject/{user_id}",
            get(subjects::get_user_subjects).post(subjects::replace_user_subjects),
        )
        // -- Scores --
        .route("/score", get(scores::leaderboard).post(scores::add_score))
        .route("/score/", get(scores::leaderboard).post(scores::add_score))
        .route("/score/{user_id}", get(scores::user_scores))
        .route("/score/{user_id}/total_score", get(users::total_score));

    Router::new().nest("/api/v1", api).with_state(state)
}
