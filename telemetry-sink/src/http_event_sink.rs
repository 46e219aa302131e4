//! Asynchronous shipping worker.
//!
//! Every sink callback packages a task onto an mpsc queue drained by a
//! single background thread, so emitters never block on the network. The
//! worker serializes envelopes, compresses blocks and issues `PUT` requests
//! against the ingestion base url. Delivery is best effort: failures are
//! logged through the library's own log stream, never retried.
use crate::stream_block::StreamBlock;
use crate::stream_info::get_stream_info;
use skylight_telemetry::stream_info::StreamInfo;
use skylight_tracing::{
    error,
    event::EventSink,
    logs::{LogBlock, LogMetadata, LogStream},
    metrics::{MetricsBlock, MetricsStream},
    process_info::{GuidMaker, ProcessInfo},
    spans::{ThreadBlock, ThreadStream},
};
use std::fmt;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
enum SinkEvent {
    Startup(Arc<ProcessInfo>),
    InitStream(Arc<StreamInfo>),
    ProcessLogBlock(Arc<LogBlock>),
    ProcessMetricsBlock(Arc<MetricsBlock>),
    ProcessThreadBlock(Arc<ThreadBlock>),
}

pub struct HttpEventSink {
    thread: Mutex<Option<std::thread::JoinHandle<()>>>,
    sender: Mutex<Option<std::sync::mpsc::Sender<SinkEvent>>>,
    queue_size: Arc<AtomicIsize>,
}

impl HttpEventSink {
    pub fn new(base_url: &str, make_guid: GuidMaker) -> Self {
        let addr = base_url.trim_end_matches('/').to_owned();
        let (sender, receiver) = std::sync::mpsc::channel::<SinkEvent>();
        let queue_size = Arc::new(AtomicIsize::new(0));
        let thread_queue_size = queue_size.clone();
        Self {
            thread: Mutex::new(Some(std::thread::spawn(move || {
                Self::thread_proc(addr, receiver, thread_queue_size, make_guid);
            }))),
            sender: Mutex::new(Some(sender)),
            queue_size,
        }
    }

    fn send(&self, event: SinkEvent) {
        let guard = self.sender.lock().unwrap();
        if let Some(sender) = guard.as_ref() {
            self.queue_size.fetch_add(1, Ordering::Relaxed);
            if let Err(e) = sender.send(event) {
                self.queue_size.fetch_sub(1, Ordering::Relaxed);
                error!("lost telemetry event: {}", e);
            }
        }
    }

    fn drain_and_join(&self) {
        // dropping the sender disconnects the channel; the worker drains
        // what is queued, then exits
        *self.sender.lock().unwrap() = None;
        if let Some(handle) = self.thread.lock().unwrap().take() {
            if handle.join().is_err() {
                eprintln!("error joining the telemetry worker thread");
            }
        }
    }

    async fn put_json(client: &reqwest::Client, url: String, body: String) {
        match client
            .put(url.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status != reqwest::StatusCode::OK {
                    error!("request to {} completed with status {}", url, status);
                }
            }
            Err(e) => {
                error!("request to {} failed: {}", url, e);
            }
        }
    }

    async fn put_binary(client: &reqwest::Client, url: String, body: Vec<u8>) {
        match client
            .put(url.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status != reqwest::StatusCode::OK {
                    error!("request to {} completed with status {}", url, status);
                }
            }
            Err(e) => {
                error!("request to {} failed: {}", url, e);
            }
        }
    }

    async fn push_process(client: &reqwest::Client, root_path: &str, process_info: Arc<ProcessInfo>) {
        match serde_json::to_string(&*process_info) {
            Ok(body) => Self::put_json(client, format!("{root_path}/process"), body).await,
            Err(e) => error!("error serializing process info: {}", e),
        }
    }

    async fn push_stream(client: &reqwest::Client, root_path: &str, stream_info: Arc<StreamInfo>) {
        match serde_json::to_string(&*stream_info) {
            Ok(body) => Self::put_json(client, format!("{root_path}/stream"), body).await,
            Err(e) => error!("error serializing stream info: {}", e),
        }
    }

    async fn push_block(
        client: &reqwest::Client,
        root_path: &str,
        block: &dyn StreamBlock,
        block_id: String,
    ) {
        match block.encode_bin(block_id) {
            Ok(payload) => Self::put_binary(client, format!("{root_path}/block"), payload).await,
            Err(e) => error!("block encoding failed: {}", e),
        }
    }

    async fn thread_proc_impl(
        addr: String,
        receiver: std::sync::mpsc::Receiver<SinkEvent>,
        queue_size: Arc<AtomicIsize>,
        make_guid: GuidMaker,
    ) {
        let client = match reqwest::Client::builder().build() {
            Ok(client) => client,
            Err(e) => {
                // logging would enqueue into the very queue nobody drains
                eprintln!("error creating the telemetry http client: {e:?}");
                return;
            }
        };
        loop {
            match receiver.recv() {
                Ok(message) => {
                    match message {
                        SinkEvent::Startup(process_info) => {
                            Self::push_process(&client, &addr, process_info).await;
                        }
                        SinkEvent::InitStream(stream_info) => {
                            Self::push_stream(&client, &addr, stream_info).await;
                        }
                        SinkEvent::ProcessLogBlock(block) => {
                            Self::push_block(&client, &addr, &*block, make_guid()).await;
                        }
                        SinkEvent::ProcessMetricsBlock(block) => {
                            Self::push_block(&client, &addr, &*block, make_guid()).await;
                        }
                        SinkEvent::ProcessThreadBlock(block) => {
                            Self::push_block(&client, &addr, &*block, make_guid()).await;
                        }
                    }
                    queue_size.fetch_sub(1, Ordering::Relaxed);
                }
                Err(_) => {
                    // can only fail when the sending half is disconnected
                    return;
                }
            }
        }
    }

    #[allow(clippy::needless_pass_by_value)] // the receiver must not stay on the calling thread
    fn thread_proc(
        addr: String,
        receiver: std::sync::mpsc::Receiver<SinkEvent>,
        queue_size: Arc<AtomicIsize>,
        make_guid: GuidMaker,
    ) {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => {
                runtime.block_on(Self::thread_proc_impl(addr, receiver, queue_size, make_guid));
            }
            Err(e) => {
                eprintln!("error creating the telemetry runtime: {e:?}");
            }
        }
    }
}

impl Drop for HttpEventSink {
    fn drop(&mut self) {
        self.drain_and_join();
    }
}

impl EventSink for HttpEventSink {
    fn on_startup(&self, process_info: Arc<ProcessInfo>) {
        self.send(SinkEvent::Startup(process_info));
    }

    fn on_shutdown(&self) {
        // the dispatcher has already rotated the final log & metric blocks
        self.drain_and_join();
    }

    fn on_log_enabled(&self, _metadata: &LogMetadata) -> bool {
        // if all previous filters succeed this sink always agrees
        true
    }

    fn on_log(&self, _desc: &LogMetadata, _time: i64, _args: fmt::Arguments<'_>) {}

    fn on_init_log_stream(&self, log_stream: &LogStream) {
        self.send(SinkEvent::InitStream(Arc::new(get_stream_info(log_stream))));
    }

    fn on_process_log_block(&self, log_block: Arc<LogBlock>) {
        self.send(SinkEvent::ProcessLogBlock(log_block));
    }

    fn on_init_metrics_stream(&self, metrics_stream: &MetricsStream) {
        self.send(SinkEvent::InitStream(Arc::new(get_stream_info(
            metrics_stream,
        ))));
    }

    fn on_process_metrics_block(&self, metrics_block: Arc<MetricsBlock>) {
        self.send(SinkEvent::ProcessMetricsBlock(metrics_block));
    }

    fn on_init_thread_stream(&self, thread_stream: &ThreadStream) {
        self.send(SinkEvent::InitStream(Arc::new(get_stream_info(
            thread_stream,
        ))));
    }

    fn on_process_thread_block(&self, thread_block: Arc<ThreadBlock>) {
        self.send(SinkEvent::ProcessThreadBlock(thread_block));
    }

    fn is_busy(&self) -> bool {
        self.queue_size.load(Ordering::Relaxed) > 0
    }
}
