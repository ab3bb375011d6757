use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;

use crate::auth::AuthService;
use crate::game_service::GameService;
use crate::statistics_service::StatisticsService;
use hangman_types::{GameError, GameGuessRequest, GameStartRequest, User};

pub mod auth;
pub mod config;
pub mod game_service;
pub mod statistics_service;

#[derive(Deserialize)]
struct HistoryQuery {
    student_id: Option<Uuid>,
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Deserialize)]
struct StatisticsQuery {
    course_id: Option<Uuid>,
    category: Option<String>,
}

pub fn create_routes(
    game_service: Arc<GameService>,
    statistics_service: Arc<StatisticsService>,
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let game_service_filter = warp::any().map({
        let game_service = game_service.clone();
        move || game_service.clone()
    });

    let statistics_filter = warp::any().map({
        let statistics_service = statistics_service.clone();
        move || statistics_service.clone()
    });

    let auth_filter = warp::any().map({
        let auth_service = auth_service.clone();
        move || auth_service.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let start_game = warp::path!("game" / "start")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::json())
        .and(game_service_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_start_game);

    let guess_letter = warp::path!("game" / Uuid / "guess")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::json())
        .and(game_service_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_guess_letter);

    let forfeit_game = warp::path!("game" / Uuid / "forfeit")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(game_service_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_forfeit_game);

    let game_status = warp::path!("game" / Uuid)
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(game_service_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_game_status);

    let history = warp::path("history")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::query::<HistoryQuery>())
        .and(game_service_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_history);

    let statistics = warp::path("statistics")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::query::<StatisticsQuery>())
        .and(statistics_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_statistics);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(start_game)
        .or(guess_letter)
        .or(forfeit_game)
        .or(game_status)
        .or(history)
        .or(statistics)
        .with(cors)
        .with(warp::log("hangman"))
}

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

fn json_reply<T: serde::Serialize>(value: &T, status: StatusCode) -> JsonReply {
    warp::reply::with_status(warp::reply::json(value), status)
}

fn error_reply(err: &GameError) -> JsonReply {
    let status = match err {
        GameError::SessionNotFound
        | GameError::UserNotFound
        | GameError::StudentNotFound
        | GameError::CourseNotFound => StatusCode::NOT_FOUND,
        GameError::AccessDenied(_) => StatusCode::FORBIDDEN,
        GameError::GameAlreadyComplete | GameError::NoWordsAvailable => StatusCode::CONFLICT,
        GameError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        GameError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Request failed: {:?}", err);
        return json_reply(
            &serde_json::json!({"error": "Internal server error"}),
            status,
        );
    }

    json_reply(&serde_json::json!({"error": err.to_string()}), status)
}

async fn authenticate(
    auth_service: &AuthService,
    auth_header: Option<String>,
) -> Result<User, JsonReply> {
    let Some(header) = auth_header else {
        return Err(json_reply(
            &serde_json::json!({"error": "Authentication required"}),
            StatusCode::UNAUTHORIZED,
        ));
    };

    match auth_service.authenticate(&header).await {
        Ok(user) => Ok(user),
        Err(GameError::Internal(err)) => {
            tracing::error!("Identity lookup failed: {:?}", err);
            Err(json_reply(
                &serde_json::json!({"error": "Internal server error"}),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
        Err(_) => Err(json_reply(
            &serde_json::json!({"error": "Invalid authentication token"}),
            StatusCode::UNAUTHORIZED,
        )),
    }
}

async fn handle_start_game(
    auth_header: Option<String>,
    request: GameStartRequest,
    game_service: Arc<GameService>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = match authenticate(&auth_service, auth_header).await {
        Ok(user) => user,
        Err(reply) => return Ok(reply),
    };

    match game_service.start_game(&user, &request).await {
        Ok(response) => Ok(json_reply(&response, StatusCode::OK)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_guess_letter(
    session_id: Uuid,
    auth_header: Option<String>,
    request: GameGuessRequest,
    game_service: Arc<GameService>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = match authenticate(&auth_service, auth_header).await {
        Ok(user) => user,
        Err(reply) => return Ok(reply),
    };

    match game_service
        .guess_letter(&user, session_id, request.letter)
        .await
    {
        Ok(response) => Ok(json_reply(&response, StatusCode::OK)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_forfeit_game(
    session_id: Uuid,
    auth_header: Option<String>,
    game_service: Arc<GameService>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = match authenticate(&auth_service, auth_header).await {
        Ok(user) => user,
        Err(reply) => return Ok(reply),
    };

    match game_service.forfeit_game(&user, session_id).await {
        Ok(response) => Ok(json_reply(&response, StatusCode::OK)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_game_status(
    session_id: Uuid,
    auth_header: Option<String>,
    game_service: Arc<GameService>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = match authenticate(&auth_service, auth_header).await {
        Ok(user) => user,
        Err(reply) => return Ok(reply),
    };

    match game_service.current_status(&user, session_id).await {
        Ok(response) => Ok(json_reply(&response, StatusCode::OK)),
        Err(err) => Ok(error_reply(&err)),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, GameError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| GameError::invalid_request("Dates must be formatted YYYY-MM-DD"))
}

async fn handle_history(
    auth_header: Option<String>,
    query: HistoryQuery,
    game_service: Arc<GameService>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = match authenticate(&auth_service, auth_header).await {
        Ok(user) => user,
        Err(reply) => return Ok(reply),
    };

    let result = match query.student_id {
        Some(student_id) => match (query.start_date.as_deref(), query.end_date.as_deref()) {
            (Some(start), Some(end)) => match (parse_date(start), parse_date(end)) {
                (Ok(start), Ok(end)) => {
                    game_service
                        .student_history_between(&user, student_id, start, end)
                        .await
                }
                (Err(err), _) | (_, Err(err)) => Err(err),
            },
            (None, None) => game_service.student_history(&user, student_id).await,
            _ => Err(GameError::invalid_request(
                "Both start_date and end_date are required",
            )),
        },
        None if query.start_date.is_some() || query.end_date.is_some() => Err(
            GameError::invalid_request("A date range requires a student_id"),
        ),
        None => game_service.history(&user).await,
    };

    match result {
        Ok(entries) => Ok(json_reply(&entries, StatusCode::OK)),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_statistics(
    auth_header: Option<String>,
    query: StatisticsQuery,
    statistics_service: Arc<StatisticsService>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = match authenticate(&auth_service, auth_header).await {
        Ok(user) => user,
        Err(reply) => return Ok(reply),
    };

    let result = match (query.course_id, query.category.as_deref()) {
        (Some(course_id), None) => statistics_service.class_statistics(&user, course_id).await,
        (None, Some(category)) => {
            statistics_service
                .category_statistics(&user, category)
                .await
        }
        (None, None) => statistics_service.statistics(&user).await,
        (Some(_), Some(_)) => Err(GameError::invalid_request(
            "Filter by either course_id or category, not both",
        )),
    };

    match result {
        Ok(snapshot) => Ok(json_reply(&snapshot, StatusCode::OK)),
        Err(err) => Ok(error_reply(&err)),
    }
}
