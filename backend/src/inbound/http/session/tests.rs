//! Cookie round-trip coverage for the session manager.

use super::*;
use crate::inbound::http::test_utils::test_session_middleware;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use rstest::rstest;

const ALICE: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

async fn login(session: SessionContext) -> Result<HttpResponse, Error> {
    let id = UserId::new(ALICE).map_err(|err| Error::internal(err.to_string()))?;
    session.establish(id, Role::Patient)?;
    Ok(HttpResponse::Ok().finish())
}

async fn whoami(session: SessionContext) -> HttpResponse {
    match session.current() {
        Some(current) => {
            HttpResponse::Ok().body(format!("{}:{}", current.user_id(), current.role()))
        }
        None => HttpResponse::Unauthorized().finish(),
    }
}

async fn logout(session: SessionContext) -> HttpResponse {
    session.destroy();
    session.destroy();
    HttpResponse::Ok().finish()
}

async fn tamper(session: ActixSession) -> HttpResponse {
    let inserted = session
        .insert(USER_ID_KEY, "not-a-uuid")
        .and_then(|()| session.insert(ROLE_KEY, "patient"));
    match inserted {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

async fn partial(session: ActixSession) -> HttpResponse {
    match session.insert(USER_ID_KEY, ALICE) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

macro_rules! call {
    ($app:expr, $uri:expr) => {
        test::call_service($app, test::TestRequest::get().uri($uri).to_request()).await
    };
    ($app:expr, $uri:expr, $cookie:expr) => {
        test::call_service(
            $app,
            test::TestRequest::get().uri($uri).cookie($cookie).to_request(),
        )
        .await
    };
}

macro_rules! session_app {
    () => {
        test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/login", web::get().to(login))
                .route("/whoami", web::get().to(whoami))
                .route("/logout", web::get().to(logout))
                .route("/tamper", web::get().to(tamper))
                .route("/partial", web::get().to(partial)),
        )
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn established_sessions_round_trip() {
    let app = session_app!();
    let res = call!(&app, "/login");
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("session cookie set");

    let res = call!(&app, "/whoami", cookie);
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert_eq!(body, format!("{ALICE}:patient"));
}

#[rstest]
#[actix_web::test]
async fn anonymous_requests_have_no_session() {
    let app = session_app!();
    let res = call!(&app, "/whoami");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case("/tamper")]
#[case("/partial")]
#[actix_web::test]
async fn malformed_state_fails_closed(#[case] setup: &str) {
    let app = session_app!();
    let res = call!(&app, setup);
    let cookie = session_cookie(&res).expect("session cookie set");

    let res = call!(&app, "/whoami", cookie);
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn destroy_clears_the_cookie() {
    let app = session_app!();
    let res = call!(&app, "/login");
    let cookie = session_cookie(&res).expect("session cookie set");

    let res = call!(&app, "/logout", cookie);
    assert_eq!(res.status(), StatusCode::OK);
    let removal = session_cookie(&res).expect("removal cookie sent");
    assert_eq!(removal.value(), "");

    let res = call!(&app, "/whoami", removal);
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
