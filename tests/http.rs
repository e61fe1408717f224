use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct LogEntry {
    date: String,
    points_earned: u32,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    total_points: u64,
    current_streak: u32,
    rank: Option<usize>,
    active_goals: usize,
    completed_goals: usize,
    logged_today: bool,
    last_7_days: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Goal {
    id: String,
    completed: bool,
    points_reward: u32,
}

#[derive(Debug, Deserialize)]
struct Row {
    rank: usize,
    user_id: String,
    display_name: String,
    total_points: u64,
}

#[derive(Debug, Deserialize)]
struct Friendship {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    user_id: String,
    display_name: String,
    message: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "streakhub_http_{}_{}.json",
        std::process::id(),
        uuid::Uuid::new_v4()
    ));
    path.to_string_lossy().to_string()
}

fn unique_user(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/leaderboard")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_streakhub"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", unique_data_path())
        .env("STREAKHUB_DAY_BOUNDARY", "utc")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn summary(client: &Client, base_url: &str, user_id: &str) -> Summary {
    client
        .get(format!("{base_url}/api/users/{user_id}/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_logging_twice_a_day_keeps_one_entry() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("logger");
    let logs_url = format!("{}/api/users/{user}/logs", server.base_url);

    let first = client
        .post(&logs_url)
        .json(&json!({ "description": "wrote a parser" }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(&logs_url)
        .json(&json!({ "description": "wrote its tests" }))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let entry: LogEntry = second.json().await.unwrap();
    assert_eq!(entry.points_earned, 10);
    assert_eq!(entry.description.as_deref(), Some("wrote its tests"));

    let logs: Vec<LogEntry> = client.get(&logs_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(logs.len(), 1);

    let stats = summary(&client, &server.base_url, &user).await;
    assert_eq!(stats.total_points, 10);
    assert_eq!(stats.current_streak, 1);
    assert!(stats.logged_today);
    assert!(stats.rank.is_some());
    assert_eq!(stats.last_7_days.len(), 7);

    let edited = client
        .patch(format!("{logs_url}/{}", entry.date))
        .json(&json!({ "description": "refactored" }))
        .send()
        .await
        .unwrap();
    assert_eq!(edited.status(), StatusCode::OK);
    let edited: LogEntry = edited.json().await.unwrap();
    assert_eq!(edited.description.as_deref(), Some("refactored"));
}

#[tokio::test]
async fn http_completing_goal_credits_reward_once() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("goal");

    let created = client
        .post(format!("{}/api/users/{user}/goals", server.base_url))
        .json(&json!({ "title": "Learn React hooks", "points_reward": 40 }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let goal: Goal = created.json().await.unwrap();
    assert_eq!(goal.points_reward, 40);
    assert!(!goal.completed);

    let before = summary(&client, &server.base_url, &user).await;
    assert_eq!(before.active_goals, 1);

    let complete_url = format!("{}/api/goals/{}/complete", server.base_url, goal.id);
    let done = client.post(&complete_url).send().await.unwrap();
    assert_eq!(done.status(), StatusCode::OK);

    let again = client.post(&complete_url).send().await.unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let after = summary(&client, &server.base_url, &user).await;
    assert_eq!(after.total_points, 40);
    assert_eq!(after.current_streak, 1);
    assert_eq!(after.active_goals, 0);
    assert_eq!(after.completed_goals, 1);
}

#[tokio::test]
async fn http_invalid_input_is_rejected() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("invalid");

    let blank_goal = client
        .post(format!("{}/api/users/{user}/goals", server.base_url))
        .json(&json!({ "title": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank_goal.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = blank_goal.json().await.unwrap();
    assert!(body["error"].is_string());

    let bad_date = client
        .patch(format!("{}/api/users/{user}/logs/yesterday", server.base_url))
        .json(&json!({ "description": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_date.status(), StatusCode::BAD_REQUEST);

    let missing_goal = client
        .post(format!(
            "{}/api/goals/{}/complete",
            server.base_url,
            uuid::Uuid::new_v4()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_goal.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_friends_board_ranks_accepted_friends() {
    let server = shared_server().await;
    let client = Client::new();
    let ada = unique_user("ada");
    let grace = unique_user("grace");

    client
        .put(format!("{}/api/users/{grace}/profile", server.base_url))
        .json(&json!({ "display_name": "Grace" }))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/api/users/{grace}/logs", server.base_url))
        .json(&json!({ "description": "compilers" }))
        .send()
        .await
        .unwrap();

    let sent = client
        .post(format!("{}/api/users/{ada}/friends", server.base_url))
        .json(&json!({ "friend_user_id": grace }))
        .send()
        .await
        .unwrap();
    assert_eq!(sent.status(), StatusCode::CREATED);
    let request: Friendship = sent.json().await.unwrap();
    assert_eq!(request.status, "pending");

    let pending: Vec<serde_json::Value> = client
        .get(format!("{}/api/users/{grace}/friend-requests", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    let accepted = client
        .post(format!(
            "{}/api/friend-requests/{}/accept",
            server.base_url, request.id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);

    let status: serde_json::Value = client
        .get(format!("{}/api/users/{grace}/friends/{ada}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "accepted");

    let board: Vec<Row> = client
        .get(format!("{}/api/users/{ada}/friends", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].user_id, grace);
    assert_eq!(board[0].display_name, "Grace");
    assert_eq!(board[0].total_points, 10);
    assert_eq!(board[1].user_id, ada);
    assert_eq!(board[1].rank, 2);
}

#[tokio::test]
async fn http_chat_lists_posted_messages() {
    let server = shared_server().await;
    let client = Client::new();
    let user = unique_user("chatter");
    let chat_url = format!("{}/api/chat", server.base_url);

    let empty = client
        .post(&chat_url)
        .json(&json!({ "user_id": user, "message": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let posted = client
        .post(&chat_url)
        .json(&json!({ "user_id": user, "message": "hello streakers" }))
        .send()
        .await
        .unwrap();
    assert_eq!(posted.status(), StatusCode::CREATED);

    let history: Vec<ChatMessage> = client.get(&chat_url).send().await.unwrap().json().await.unwrap();
    let mine = history
        .iter()
        .find(|message| message.user_id == user)
        .expect("posted message missing from history");
    assert_eq!(mine.message, "hello streakers");
    assert_eq!(mine.display_name, "Anonymous User");
}

#[tokio::test]
async fn http_index_renders_leaderboard() {
    let server = shared_server().await;
    let html = Client::new()
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Global Leaderboard"));
}
