//! Behaviour tests running the lint against a backend tree on disk.

use std::cell::RefCell;
use std::fs;

use architecture_lint::{ArchitectureLintError, Violation, lint_backend_sources};
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

struct BackendWorld {
    root: TempDir,
    outcome: RefCell<Option<Result<(), ArchitectureLintError>>>,
}

impl BackendWorld {
    fn new() -> Self {
        Self {
            root: TempDir::new().expect("temp dir"),
            outcome: RefCell::new(None),
        }
    }

    fn backend_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.root.path().join("backend")).expect("UTF-8 temp path")
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.backend_dir().join("src").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create module directory");
        }
        fs::write(&path, contents).expect("write module");
    }

    fn violations(&self) -> Vec<Violation> {
        match self.outcome.borrow().as_ref().expect("lint ran") {
            Err(ArchitectureLintError::Violations(found)) => found.clone(),
            other => panic!("expected violations, got {other:?}"),
        }
    }
}

#[fixture]
fn world() -> BackendWorld {
    BackendWorld::new()
}

#[given("a backend with clean domain, inbound and outbound modules")]
fn a_clean_backend(world: &BackendWorld) {
    world.write(
        "domain/message.rs",
        "pub struct MessageBody(String); impl MessageBody { pub fn len(&self) -> usize { self.0.len() } }",
    );
    world.write(
        "domain/messaging_service.rs",
        "use super::message::MessageBody; use tracing::info; pub fn send(body: &MessageBody) { info!(len = body.len(), \"message sent\"); }",
    );
    world.write(
        "inbound/http/messages.rs",
        "use actix_web::HttpResponse; use crate::domain::message::MessageBody; pub fn created(_: MessageBody) -> HttpResponse { HttpResponse::Created().finish() }",
    );
    world.write(
        "outbound/persistence/diesel_message_repository.rs",
        "use diesel::prelude::*; use crate::domain::message::MessageBody; pub struct DieselMessageRepository; impl DieselMessageRepository { pub fn save(&self, _: MessageBody) {} }",
    );
    // Wiring lives outside the hexagon and is not linted.
    world.write(
        "server/state_builders.rs",
        "use crate::outbound::persistence::DieselMessageRepository; use crate::inbound::http;",
    );
}

#[given("an HTTP handler that imports the Diesel message repository")]
fn handler_imports_repository(world: &BackendWorld) {
    world.write(
        "inbound/http/messages.rs",
        "use crate::outbound::persistence::diesel_message_repository::DieselMessageRepository; pub fn handler(repo: &DieselMessageRepository) { let _ = repo; }",
    );
}

#[given("a domain service that builds an actix response")]
fn domain_builds_response(world: &BackendWorld) {
    world.write(
        "domain/messaging_service.rs",
        "pub fn send() -> actix_web::HttpResponse { actix_web::HttpResponse::Ok().finish() }",
    );
}

#[given("a persistence adapter that imports the HTTP layer")]
fn adapter_imports_http(world: &BackendWorld) {
    world.write(
        "outbound/persistence/diesel_message_repository.rs",
        "use crate::inbound::http::messages::created; pub fn save() { let _ = created; }",
    );
}

#[when("the architecture lint runs")]
fn the_lint_runs(world: &BackendWorld) {
    let outcome = lint_backend_sources(&world.backend_dir());
    *world.outcome.borrow_mut() = Some(outcome);
}

#[then("the lint succeeds")]
fn the_lint_succeeds(world: &BackendWorld) {
    let outcome = world.outcome.borrow();
    let outcome = outcome.as_ref().expect("lint ran");
    assert!(outcome.is_ok(), "expected success, got {outcome:?}");
}

#[then("{file} is reported for {dependency}")]
fn file_is_reported(world: &BackendWorld, file: String, dependency: String) {
    let violations = world.violations();
    assert!(
        violations.iter().any(|violation| {
            violation.file.as_str() == file && violation.to_string().ends_with(&dependency)
        }),
        "expected {file} to depend on {dependency}, got {violations:?}"
    );
}

#[then("{count} violations are reported")]
fn violations_are_reported(world: &BackendWorld, count: usize) {
    assert_eq!(world.violations().len(), count);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "A clean backend passes"
)]
fn a_clean_backend_passes(world: BackendWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "An HTTP handler reaching into persistence is rejected"
)]
fn handler_reaching_into_persistence(world: BackendWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "The domain importing the web framework is rejected"
)]
fn domain_importing_web_framework(world: BackendWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "Every offending file is reported in one run"
)]
fn every_offending_file_is_reported(world: BackendWorld) {
    drop(world);
}
