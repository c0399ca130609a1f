mod args;
mod auth;
mod quiz;
mod quizhost;
mod record;
mod session;
mod store;
mod user;

use std::convert::Infallible;
use std::process;
use std::sync::Arc;

use clap::Parser;
use log::error;
use serde::{Deserialize, Serialize};
use warp::{http, Filter, Rejection, Reply};

use crate::args::Args;
use crate::quiz::QuizCreate;
use crate::quizhost::{Error, QuizHost};
use crate::record::ResultSubmit;
use crate::store::Store;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let args = Args::parse();

    let addr = match args.addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("couldn't parse listen address: {e}");
            process::exit(1);
        }
    };

    let host = match QuizHost::load(Store::new(args.data_dir())) {
        Ok(host) => Arc::new(host),
        Err(e) => {
            error!("couldn't load data files: {e:?}");
            process::exit(1);
        }
    };

    let api = routes(host).with(cors()).with(warp::log("quizhost"));

    match args.tls() {
        Some((cert, key)) => {
            warp::serve(api)
                .tls()
                .cert_path(cert)
                .key_path(key)
                .run(addr)
                .await
        }
        None => warp::serve(api).run(addr).await,
    }
}

#[derive(Debug, Deserialize)]
struct Login {
    username: String,
    password: String,
}

fn routes(
    host: Arc<QuizHost>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let login = warp::path!("login-cookie")
        .and(warp::post())
        .and(warp::query::<Login>())
        .and(with_host(Arc::clone(&host)))
        .map(|login: Login, host: Arc<QuizHost>| {
            #[derive(Serialize)]
            struct LoggedIn {
                message: &'static str,
                username: String,
            }

            match host.login(&login.username, &login.password) {
                Ok(token) => warp::reply::with_header(
                    warp::reply::json(&LoggedIn {
                        message: "Logged in",
                        username: login.username,
                    }),
                    http::header::SET_COOKIE,
                    auth::session_cookie(&token),
                )
                .into_response(),
                Err(e) => error_reply(e),
            }
        });

    let quizzes = {
        let list = warp::path!("quizzes")
            .and(warp::get())
            .and(with_host(Arc::clone(&host)))
            .map(|host: Arc<QuizHost>| warp::reply::json(&host.quizzes()).into_response());

        // a non-numeric id never matches the route, so a request for
        // e.g. /quizzes/-1 falls through to warp's own 404
        let get = warp::path!("quizzes" / usize)
            .and(warp::get())
            .and(with_host(Arc::clone(&host)))
            .map(|id: usize, host: Arc<QuizHost>| match host.quiz(id) {
                Ok(quiz) => warp::reply::json(&quiz).into_response(),
                Err(e) => error_reply(e),
            });

        let create = warp::path!("quizzes")
            .and(warp::post())
            .and(warp::body::json())
            .and(warp::cookie::optional::<String>(auth::COOKIE_NAME))
            .and(with_host(Arc::clone(&host)))
            .map(
                |quiz: QuizCreate, token: Option<String>, host: Arc<QuizHost>| {
                    #[derive(Serialize)]
                    struct Created {
                        message: &'static str,
                        id: usize,
                    }

                    let created = host
                        .authenticate(token.as_deref())
                        .and_then(|username| host.create_quiz(&username, quiz));

                    match created {
                        Ok(id) => warp::reply::json(&Created {
                            message: "Created",
                            id,
                        })
                        .into_response(),
                        Err(e) => error_reply(e),
                    }
                },
            );

        list.or(get).or(create)
    };

    let results = {
        let save = warp::path!("results")
            .and(warp::post())
            .and(warp::body::json())
            .and(warp::cookie::optional::<String>(auth::COOKIE_NAME))
            .and(with_host(Arc::clone(&host)))
            .map(
                |result: ResultSubmit, token: Option<String>, host: Arc<QuizHost>| {
                    #[derive(Serialize)]
                    struct Saved {
                        message: &'static str,
                    }

                    let saved = host
                        .authenticate(token.as_deref())
                        .and_then(|username| host.save_result(&username, result));

                    match saved {
                        Ok(()) => warp::reply::json(&Saved { message: "Saved" }).into_response(),
                        Err(e) => error_reply(e),
                    }
                },
            );

        let mine = warp::path!("my-results")
            .and(warp::get())
            .and(warp::cookie::optional::<String>(auth::COOKIE_NAME))
            .and(with_host(Arc::clone(&host)))
            .map(|token: Option<String>, host: Arc<QuizHost>| {
                match host.authenticate(token.as_deref()) {
                    Ok(username) => warp::reply::json(&host.my_results(&username)).into_response(),
                    Err(e) => error_reply(e),
                }
            });

        save.or(mine)
    };

    let logout = warp::path!("logout")
        .and(warp::post())
        .and(warp::cookie::optional::<String>(auth::COOKIE_NAME))
        .and(with_host(host))
        .map(|token: Option<String>, host: Arc<QuizHost>| {
            #[derive(Serialize)]
            struct LoggedOut {
                message: &'static str,
            }

            host.logout(token.as_deref());

            warp::reply::with_header(
                warp::reply::json(&LoggedOut {
                    message: "Logged out",
                }),
                http::header::SET_COOKIE,
                auth::clear_cookie(),
            )
            .into_response()
        });

    login.or(quizzes).or(results).or(logout)
}

fn with_host(
    host: Arc<QuizHost>,
) -> impl Filter<Extract = (Arc<QuizHost>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&host))
}

fn error_reply(e: Error) -> warp::reply::Response {
    #[derive(Serialize)]
    struct Detail {
        detail: &'static str,
    }

    warp::reply::with_status(
        warp::reply::json(&Detail { detail: e.detail() }),
        e.into(),
    )
    .into_response()
}

fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_origins(["https://localhost:5173", "http://localhost:5173"])
        .allow_methods(["GET", "POST"])
        .allow_headers(["content-type"])
        .allow_credentials(true)
}
