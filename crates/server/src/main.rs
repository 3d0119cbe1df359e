// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod claims;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use nafuda::{Clock, RecipientPolicy, ScopedRecipients, SystemClock};
use nafuda_api::{
    ApiError, AssignmentResponse, AuthorizationGate, BroadcastResponse, CallerIdentity,
    DEFAULT_ADMIN_GROUP, DEFAULT_GROUPS_CLAIM, Envelope, ErrorKind, FieldMap,
    GroupMembershipGate, MembersResponse, PaymentResponse, RegisterMemberResponse,
    RemovePaymentResponse, RemoveSubmissionsResponse, RequestContext, SubmissionResponse,
    SweepResponse, UnassignResponse, assign_payment, broadcast_payment, clear_overdue,
    create_payment, list_assignments, list_payments, list_submissions, lookup_members,
    register_member, remove_payment, remove_submissions, run_overdue_sweep, submit_payment,
    translate_persistence_error, unassign_payment, update_assignment, update_payment,
};
use nafuda_domain::{MemberFilter, Timestamp};
use nafuda_persistence::Persistence;

use crate::claims::Caller;

/// Nafuda Server - HTTP server for the dojo payment ledger
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Group that grants administrative access
    #[arg(long, default_value = DEFAULT_ADMIN_GROUP)]
    admin_group: String,

    /// Claim that carries the caller's groups
    #[arg(long, default_value = DEFAULT_GROUPS_CLAIM)]
    groups_claim: String,

    /// Seconds between scheduled overdue sweeps; 0 disables the scheduler
    #[arg(long, default_value_t = 3600)]
    sweep_interval_secs: u64,

    /// Members billed by dojo broadcasts (comma-separated: all, active, no-guests, exempt)
    #[arg(long, default_value = "active,no-guests")]
    dojo_recipients: MemberFilter,

    /// Members billed by federation broadcasts
    #[arg(long, default_value = "no-guests")]
    federation_recipients: MemberFilter,
}

/// Application state shared across handlers.
///
/// The single database connection sits behind a mutex, so requests and the
/// scheduled sweep run one operation at a time.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    gate: Arc<dyn AuthorizationGate>,
    policy: Arc<dyn RecipientPolicy>,
    clock: Arc<dyn Clock>,
    /// Claim name read by the caller extractor.
    groups_claim: Arc<str>,
}

impl AppState {
    fn context<'a>(&'a self, caller: &'a CallerIdentity) -> RequestContext<'a> {
        RequestContext {
            gate: self.gate.as_ref(),
            caller,
            clock: self.clock.as_ref(),
        }
    }
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    error: ApiError,
}

const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::MissingField
        | ErrorKind::InvalidField
        | ErrorKind::InvalidMember
        | ErrorKind::InvalidPayment
        | ErrorKind::InvalidDueScope => StatusCode::BAD_REQUEST,
        ErrorKind::NoSuchAssignment => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateAssignment => StatusCode::CONFLICT,
        ErrorKind::UpstreamFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ApiError> for HttpError {
    fn from(error: ApiError) -> Self {
        Self {
            status: status_for(error.kind()),
            error,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(Envelope::error(&self.error))).into_response()
    }
}

type HttpResult<T> = Result<Json<Envelope<T>>, HttpError>;

const fn success<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope::success(data))
}

/// Parses a JSON body into request fields. An empty body falls back to the
/// query string, so `DELETE` requests may carry either.
fn request_fields(query: HashMap<String, String>, body: &Bytes) -> Result<FieldMap, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FieldMap::from_query(query));
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::invalid("body", format!("malformed JSON: {e}")))?;
    FieldMap::from_json(value)
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    service: &'static str,
    version: &'static str,
}

/// Handler for GET `/health`. Checks the database connection; needs no
/// identity claims.
async fn handle_health(AxumState(app_state): AxumState<AppState>) -> HttpResult<HealthResponse> {
    let mut persistence = app_state.persistence.lock().await;
    persistence
        .verify_foreign_key_enforcement()
        .map_err(translate_persistence_error)?;
    drop(persistence);

    Ok(success(HealthResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    }))
}

// ---------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------

/// Handler for GET `/payments`. Open to every authenticated caller.
async fn handle_list_payments(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
) -> HttpResult<Vec<PaymentResponse>> {
    info!(subject = %caller.subject, "Handling list_payments request");
    let fields: FieldMap = FieldMap::from_query(query);
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(list_payments(&mut persistence, &fields)?))
}

/// Handler for POST `/payments`.
async fn handle_create_payment(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<PaymentResponse> {
    info!(subject = %caller.subject, "Handling create_payment request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(create_payment(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

/// Handler for PATCH `/payments`.
async fn handle_update_payment(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<PaymentResponse> {
    info!(subject = %caller.subject, "Handling update_payment request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(update_payment(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

/// Handler for DELETE `/payments`.
async fn handle_remove_payment(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<RemovePaymentResponse> {
    info!(subject = %caller.subject, "Handling remove_payment request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(remove_payment(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

/// Handler for POST `/payments/broadcast`.
async fn handle_broadcast_payment(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<BroadcastResponse> {
    info!(subject = %caller.subject, "Handling broadcast_payment request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(broadcast_payment(
        &mut persistence,
        &app_state.context(&caller),
        app_state.policy.as_ref(),
        &fields,
    )?))
}

/// Handler for POST `/payments/overdue/clear`.
async fn handle_clear_overdue(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
) -> HttpResult<SweepResponse> {
    info!(subject = %caller.subject, "Handling clear_overdue request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(clear_overdue(&mut persistence, &app_state.context(&caller))?))
}

// ---------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------

/// Handler for GET `/assignments`.
async fn handle_list_assignments(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
) -> HttpResult<Vec<AssignmentResponse>> {
    let fields: FieldMap = FieldMap::from_query(query);
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(list_assignments(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

/// Handler for POST `/assignments`.
async fn handle_assign_payment(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<AssignmentResponse> {
    info!(subject = %caller.subject, "Handling assign_payment request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(assign_payment(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

/// Handler for PATCH `/assignments`.
async fn handle_update_assignment(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<AssignmentResponse> {
    info!(subject = %caller.subject, "Handling update_assignment request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(update_assignment(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

/// Handler for DELETE `/assignments`.
async fn handle_unassign_payment(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<UnassignResponse> {
    info!(subject = %caller.subject, "Handling unassign_payment request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(unassign_payment(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

// ---------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------

/// Handler for GET `/submissions`.
async fn handle_list_submissions(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
) -> HttpResult<Vec<SubmissionResponse>> {
    let fields: FieldMap = FieldMap::from_query(query);
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(list_submissions(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

/// Handler for POST `/submissions`.
async fn handle_submit_payment(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<SubmissionResponse> {
    info!(subject = %caller.subject, "Handling submit_payment request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(submit_payment(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

/// Handler for DELETE `/submissions`.
async fn handle_remove_submissions(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<RemoveSubmissionsResponse> {
    info!(subject = %caller.subject, "Handling remove_submissions request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(remove_submissions(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

// ---------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------

/// Handler for GET `/members`.
async fn handle_lookup_members(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
) -> HttpResult<MembersResponse> {
    let fields: FieldMap = FieldMap::from_query(query);
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(lookup_members(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

/// Handler for POST `/members`.
async fn handle_register_member(
    AxumState(app_state): AxumState<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HttpResult<RegisterMemberResponse> {
    info!(subject = %caller.subject, "Handling register_member request");
    let fields: FieldMap = request_fields(query, &body)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(success(register_member(
        &mut persistence,
        &app_state.context(&caller),
        &fields,
    )?))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route(
            "/payments",
            get(handle_list_payments)
                .post(handle_create_payment)
                .patch(handle_update_payment)
                .delete(handle_remove_payment),
        )
        .route("/payments/broadcast", post(handle_broadcast_payment))
        .route("/payments/overdue/clear", post(handle_clear_overdue))
        .route(
            "/assignments",
            get(handle_list_assignments)
                .post(handle_assign_payment)
                .patch(handle_update_assignment)
                .delete(handle_unassign_payment),
        )
        .route(
            "/submissions",
            get(handle_list_submissions)
                .post(handle_submit_payment)
                .delete(handle_remove_submissions),
        )
        .route(
            "/members",
            get(handle_lookup_members).post(handle_register_member),
        )
        .with_state(app_state)
}

/// Runs one overdue sweep as of the state's clock.
async fn run_scheduled_sweep(app_state: &AppState) -> Option<SweepResponse> {
    let as_of: Timestamp = app_state.clock.now();
    let mut persistence = app_state.persistence.lock().await;
    match run_overdue_sweep(&mut persistence, as_of) {
        Ok(sweep) => {
            info!(as_of = %sweep.as_of, marked = sweep.marked_count, "Scheduled overdue sweep");
            Some(sweep)
        }
        Err(e) => {
            error!(error = %e, "Scheduled overdue sweep failed");
            None
        }
    }
}

fn spawn_sweep_scheduler(app_state: AppState, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker: tokio::time::Interval = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_scheduled_sweep(&app_state).await;
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Nafuda Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let policy: ScopedRecipients = ScopedRecipients {
        federation: args.federation_recipients,
        dojo: args.dojo_recipients,
    };
    info!(
        admin_group = %args.admin_group,
        groups_claim = %args.groups_claim,
        dojo = %policy.dojo,
        federation = %policy.federation,
        "Authorization and recipient policy"
    );

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        gate: Arc::new(GroupMembershipGate::new(&args.admin_group)),
        policy: Arc::new(policy),
        clock: Arc::new(SystemClock),
        groups_claim: Arc::from(args.groups_claim.as_str()),
    };

    if args.sweep_interval_secs > 0 {
        info!(
            interval_secs = args.sweep_interval_secs,
            "Starting overdue sweep scheduler"
        );
        spawn_sweep_scheduler(
            app_state.clone(),
            Duration::from_secs(args.sweep_interval_secs),
        );
    }

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
