use std::result;
use std::sync::Mutex;

use log::{error, info, trace};
use warp::http;

use crate::quiz::{Quiz, QuizCreate, QuizSummary};
use crate::record::{ResultRecord, ResultSubmit};
use crate::session::Sessions;
use crate::store::{LoadError, Store};
use crate::user::{self, Users};

/// All process state: the three persisted collections plus the
/// in-memory session registry. Built once in main and shared by handle;
/// only correct as a single-process deployment - two processes over the
/// same data directory race at whole-file granularity.
pub struct QuizHost {
    store: Store,
    users: Mutex<Users>,
    quizzes: Mutex<Vec<Quiz>>,
    results: Mutex<Vec<ResultRecord>>,
    sessions: Mutex<Sessions>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Internal,
    Unauthorized,
    WrongPassword,
    NotFound,
}

pub type Result<T> = result::Result<T, Error>;

impl Into<http::StatusCode> for Error {
    fn into(self) -> http::StatusCode {
        match self {
            Self::Internal => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => http::StatusCode::UNAUTHORIZED,
            Self::WrongPassword => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
        }
    }
}

impl Error {
    pub fn detail(self) -> &'static str {
        match self {
            Self::Internal => "Internal error",
            Self::Unauthorized => "Auth required",
            Self::WrongPassword => "Wrong password",
            Self::NotFound => "Not found",
        }
    }
}

impl QuizHost {
    /// Reads the three snapshots once at startup. A missing file is
    /// fine (defaults apply), an unreadable one is fatal.
    pub fn load(store: Store) -> result::Result<Self, LoadError> {
        let users = store.load("users.json", user::defaults())?;
        let quizzes: Vec<Quiz> = store.load("quizzes.json", Vec::new())?;
        let results: Vec<ResultRecord> = store.load("results.json", Vec::new())?;

        info!(
            "loaded {} users, {} quizzes, {} results",
            users.len(),
            quizzes.len(),
            results.len(),
        );

        Ok(Self {
            store,
            users: Mutex::new(users),
            quizzes: Mutex::new(quizzes),
            results: Mutex::new(results),
            sessions: Mutex::new(Sessions::new()),
        })
    }

    /// First login with an unseen username registers it with the given
    /// password. Returns a fresh session token; earlier tokens for the
    /// same user stay valid.
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        let mut users = self.users.lock().unwrap();

        match users.get(username) {
            None => {
                users.insert(username.to_string(), password.to_string());

                if let Err(e) = self.store.save("users.json", &*users) {
                    error!("write users: {e:?}");
                    return Err(Error::Internal);
                }

                info!("{username} login: registered");
            }
            Some(stored) if stored != password => {
                error!("wrong password for {username}");
                return Err(Error::WrongPassword);
            }
            Some(_) => {}
        }
        drop(users);

        let token = self.sessions.lock().unwrap().issue(username);
        info!("{username} login: session issued");

        Ok(token)
    }

    /// The only authorization check in the system: a cookie token that
    /// the registry knows about, or nothing.
    pub fn authenticate(&self, token: Option<&str>) -> Result<String> {
        let token = token.ok_or(Error::Unauthorized)?;

        let sessions = self.sessions.lock().unwrap();
        match sessions.resolve(token) {
            Some(username) => {
                trace!("found {username} by session");
                Ok(username.to_string())
            }
            None => {
                error!("no user found for presented token");
                Err(Error::Unauthorized)
            }
        }
    }

    /// Always succeeds, token or no token.
    pub fn logout(&self, token: Option<&str>) {
        if let Some(token) = token {
            self.sessions.lock().unwrap().revoke(token);
            info!("session revoked");
        }
    }

    pub fn quizzes(&self) -> Vec<QuizSummary> {
        let quizzes = self.quizzes.lock().unwrap();

        trace!("listing {} quizzes", quizzes.len());

        quizzes
            .iter()
            .enumerate()
            .map(|(id, quiz)| quiz.summary(id))
            .collect()
    }

    pub fn quiz(&self, id: usize) -> Result<Quiz> {
        let quizzes = self.quizzes.lock().unwrap();
        quizzes.get(id).cloned().ok_or(Error::NotFound)
    }

    pub fn create_quiz(&self, username: &str, create: QuizCreate) -> Result<usize> {
        let mut quizzes = self.quizzes.lock().unwrap();

        quizzes.push(create.into_quiz(username));

        if let Err(e) = self.store.save("quizzes.json", &*quizzes) {
            error!("write quizzes: {e:?}");
            return Err(Error::Internal);
        }

        let id = quizzes.len() - 1;
        info!("{username} created quiz {id}");

        Ok(id)
    }

    pub fn save_result(&self, username: &str, submit: ResultSubmit) -> Result<()> {
        let mut results = self.results.lock().unwrap();

        results.push(submit.into_record(username));

        if let Err(e) = self.store.save("results.json", &*results) {
            error!("write results: {e:?}");
            return Err(Error::Internal);
        }

        info!("{username} saved a result");
        Ok(())
    }

    /// Linear scan over the whole collection, in storage order.
    pub fn my_results(&self, username: &str) -> Vec<ResultRecord> {
        self.results
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.username == username)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::quiz::{Question, QuizOption};

    fn tempdir() -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("quizhost-host-{:016x}", rand::random::<u64>()));
        fs::create_dir_all(&p).unwrap();
        p
    }

    fn host_in(dir: &Path) -> QuizHost {
        QuizHost::load(Store::new(dir)).unwrap()
    }

    fn some_quiz(title: &str) -> QuizCreate {
        QuizCreate {
            title: title.into(),
            result_names: vec!["Cat".into(), "Dog".into()],
            questions: vec![Question {
                text: "Pick a noise".into(),
                options: vec![
                    QuizOption {
                        text: "Purr".into(),
                        result_index: 0,
                    },
                    QuizOption {
                        text: "Woof".into(),
                        result_index: 1,
                    },
                ],
            }],
        }
    }

    fn submit(title: &str, text: &str) -> ResultSubmit {
        ResultSubmit {
            quiz_title: title.into(),
            result_text: text.into(),
            date: "2024-01-01".into(),
        }
    }

    #[test]
    fn first_login_registers() {
        let host = host_in(&tempdir());

        host.login("alice", "hunter2").unwrap();

        // same password works again, a different one doesn't
        host.login("alice", "hunter2").unwrap();
        assert_eq!(host.login("alice", "other"), Err(Error::WrongPassword));
    }

    #[test]
    fn admin_is_seeded() {
        let host = host_in(&tempdir());

        host.login("admin", "123").unwrap();
        assert_eq!(host.login("admin", "wrong"), Err(Error::WrongPassword));
    }

    #[test]
    fn token_resolves_to_the_user() {
        let host = host_in(&tempdir());

        let token = host.login("alice", "pw").unwrap();

        assert_eq!(host.authenticate(Some(&token)).unwrap(), "alice");
        assert_eq!(host.authenticate(None), Err(Error::Unauthorized));
        assert_eq!(host.authenticate(Some("bogus")), Err(Error::Unauthorized));
    }

    #[test]
    fn logout_revokes_just_that_token() {
        let host = host_in(&tempdir());

        let first = host.login("alice", "pw").unwrap();
        let second = host.login("alice", "pw").unwrap();

        host.logout(Some(&first));

        assert_eq!(host.authenticate(Some(&first)), Err(Error::Unauthorized));
        assert_eq!(host.authenticate(Some(&second)).unwrap(), "alice");

        // logging out with no or an unknown token is a no-op
        host.logout(None);
        host.logout(Some(&first));
    }

    #[test]
    fn quiz_lookup_respects_bounds() {
        let host = host_in(&tempdir());

        assert_eq!(host.create_quiz("alice", some_quiz("first")).unwrap(), 0);
        assert_eq!(host.create_quiz("alice", some_quiz("second")).unwrap(), 1);

        assert_eq!(host.quiz(1).unwrap().title, "second");
        assert_eq!(host.quiz(2), Err(Error::NotFound));
    }

    #[test]
    fn listing_projects_in_creation_order() {
        let host = host_in(&tempdir());

        host.create_quiz("alice", some_quiz("first")).unwrap();
        host.create_quiz("bob", some_quiz("second")).unwrap();

        let summaries = host.quizzes();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, 0);
        assert_eq!(summaries[0].author, "alice");
        assert_eq!(summaries[1].id, 1);
        assert_eq!(summaries[1].title, "second");
    }

    #[test]
    fn author_comes_from_the_session_identity() {
        let host = host_in(&tempdir());

        host.create_quiz("alice", some_quiz("q")).unwrap();

        assert_eq!(host.quiz(0).unwrap().author.as_deref(), Some("alice"));
    }

    #[test]
    fn results_are_filtered_per_user() {
        let host = host_in(&tempdir());

        host.save_result("alice", submit("q", "Cat")).unwrap();
        host.save_result("bob", submit("q", "Dog")).unwrap();
        host.save_result("alice", submit("q", "Dog")).unwrap();

        let mine = host.my_results("alice");
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].result_text, "Cat");
        assert_eq!(mine[1].result_text, "Dog");

        assert_eq!(host.my_results("bob").len(), 1);
        assert_eq!(host.my_results("carol").len(), 0);
    }

    #[test]
    fn restart_keeps_data_but_not_sessions() {
        let dir = tempdir();

        let token = {
            let host = host_in(&dir);
            let token = host.login("alice", "pw").unwrap();
            host.create_quiz("alice", some_quiz("kept")).unwrap();
            host.save_result("alice", submit("kept", "Cat")).unwrap();
            token
        };

        let host = host_in(&dir);

        assert_eq!(host.quiz(0).unwrap().title, "kept");
        assert_eq!(host.my_results("alice").len(), 1);

        // alice survived as a registered user, not as a fresh signup
        assert!(host.login("alice", "pw").is_ok());
        assert_eq!(host.login("alice", "other"), Err(Error::WrongPassword));

        // but every pre-restart token is dead
        assert_eq!(host.authenticate(Some(&token)), Err(Error::Unauthorized));
    }

    #[test]
    fn corrupt_snapshot_is_fatal_at_startup() {
        let dir = tempdir();
        fs::write(dir.join("quizzes.json"), "[{").unwrap();

        assert!(QuizHost::load(Store::new(&dir)).is_err());
    }
}
