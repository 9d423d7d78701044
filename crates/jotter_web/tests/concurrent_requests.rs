use jotter_core::{open_db_in_memory, DbError, MarkdownRenderer, NoteService, SqliteNoteRepository};
use jotter_web::routes::JotterRocketBuildExt;
use jotter_web::{AppState, Templates};
use rocket::futures::future::join_all;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

fn template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

async fn client() -> Client {
    let repo = SqliteNoteRepository::try_new(open_db_in_memory().unwrap()).unwrap();
    let state = AppState::new(
        NoteService::new(repo, MarkdownRenderer::new()),
        Templates::load(template_dir()).unwrap(),
    );
    let rocket = rocket::build().install_jotter(state, &template_dir().join("static"));
    Client::tracked(rocket).await.unwrap()
}

#[rocket::async_test]
async fn concurrent_creates_all_land() {
    let client = client().await;

    let requests = (0..8).map(|n| {
        client
            .post("/new")
            .header(ContentType::Form)
            .body(format!("title=note-{n}&content=body-{n}"))
            .dispatch()
    });
    let responses = join_all(requests).await;

    let locations: HashSet<String> = responses
        .iter()
        .map(|response| {
            assert_eq!(response.status(), Status::Found);
            response.headers().get_one("Location").unwrap().to_string()
        })
        .collect();
    assert_eq!(locations.len(), 8);

    let body = client.get("/").dispatch().await.into_string().await.unwrap();
    assert!(body.contains("8 notes"));
    for n in 0..8 {
        assert!(body.contains(&format!("note-{n}")));
    }
}

#[rocket::async_test]
async fn waiting_on_storage_does_not_stall_other_requests() {
    let client = client().await;
    let notes = Arc::clone(&client.rocket().state::<AppState>().unwrap().notes);

    let (locked_tx, locked_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let holder = thread::spawn(move || {
        notes
            .repo()
            .storage()
            .with_connection(|_| {
                locked_tx.send(()).unwrap();
                Ok::<_, DbError>(release_rx.recv_timeout(Duration::from_secs(5)).is_ok())
            })
            .unwrap()
    });
    locked_rx.recv().unwrap();

    // The listing blocks on the held connection; the form page must still be
    // served, and serving it is what releases the connection.
    let (listing, form) = rocket::tokio::join!(
        async {
            let response = client.get("/").dispatch().await;
            (response.status(), response.into_string().await.unwrap())
        },
        async {
            let status = client.get("/new").dispatch().await.status();
            release_tx.send(()).unwrap();
            status
        }
    );

    assert!(holder.join().unwrap(), "form page waited for the storage lock");
    assert_eq!(form, Status::Ok);
    assert_eq!(listing.0, Status::Ok);
    assert!(listing.1.contains("No notes yet"));
}
