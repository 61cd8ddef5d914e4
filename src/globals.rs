//! Process-wide runtime and store handle for the C ABI. Rust callers open an
//! [`InspectionStore`] themselves and never touch this module.

use lazy_static::lazy_static;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

use crate::config::StoreConfig;
use crate::domains::command::CommandService;
use crate::domains::persistence::InspectionStore;
use crate::ffi::error::{FFIError, FFIResult};

lazy_static! {
    static ref INIT_MUTEX: tokio::sync::Mutex<()> = tokio::sync::Mutex::new(());
    static ref INITIALIZED: AtomicBool = AtomicBool::new(false);

    static ref RUNTIME: Mutex<Option<Arc<Runtime>>> = Mutex::new(None);
    static ref COMMAND_SERVICE: Mutex<Option<Arc<CommandService>>> = Mutex::new(None);
}

/// The shared multi-threaded runtime, started on first use
pub fn get_runtime() -> FFIResult<Arc<Runtime>> {
    let mut slot = RUNTIME
        .lock()
        .map_err(|_| FFIError::internal("RUNTIME lock poisoned".to_string()))?;
    if let Some(runtime) = slot.as_ref() {
        return Ok(runtime.clone());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("inspection-core")
        .build()
        .map_err(|e| FFIError::internal(format!("Failed to start tokio runtime: {}", e)))?;
    let runtime = Arc::new(runtime);
    *slot = Some(runtime.clone());
    Ok(runtime)
}

/// Drive `future` to completion on the shared runtime
pub fn block_on_async<F: Future>(future: F) -> FFIResult<F::Output> {
    Ok(get_runtime()?.block_on(future))
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or(if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    });
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Open the store once per process. Later calls are no-ops until
/// [`shutdown`] runs.
pub async fn initialize(config: StoreConfig) -> FFIResult<()> {
    let _guard = INIT_MUTEX.lock().await;

    if INITIALIZED.load(Ordering::Acquire) {
        return Ok(());
    }

    init_logging();
    log::info!("Opening inspection store at {}", config.database_url);

    let store = InspectionStore::open(config).await?;
    let service = Arc::new(CommandService::new(Arc::new(store)));

    *COMMAND_SERVICE
        .lock()
        .map_err(|_| FFIError::internal("COMMAND_SERVICE lock poisoned".to_string()))? = Some(service);
    INITIALIZED.store(true, Ordering::Release);

    log::info!("Inspection store ready");
    Ok(())
}

pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

pub fn get_command_service() -> FFIResult<Arc<CommandService>> {
    COMMAND_SERVICE
        .lock()
        .map_err(|_| FFIError::internal("COMMAND_SERVICE lock poisoned".to_string()))?
        .clone()
        .ok_or_else(FFIError::not_initialized)
}

pub fn get_store() -> FFIResult<Arc<InspectionStore>> {
    Ok(get_command_service()?.store().clone())
}

/// Flush, stop the autosave worker and forget the store
pub async fn shutdown() -> FFIResult<()> {
    let _guard = INIT_MUTEX.lock().await;

    let service = COMMAND_SERVICE
        .lock()
        .map_err(|_| FFIError::internal("COMMAND_SERVICE lock poisoned".to_string()))?
        .take();
    INITIALIZED.store(false, Ordering::Release);

    if let Some(service) = service {
        service.store().shutdown().await?;
        log::info!("Inspection store shut down");
    }
    Ok(())
}
