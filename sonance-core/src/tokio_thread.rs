use std::pin::Pin;

type Task = Pin<Box<dyn Future<Output = ()> + Send>>;

pub struct TokioThread {
    tokio: TokioHandle,
    _tokio_thread_handle: std::thread::JoinHandle<()>,
}
#[derive(Clone)]
pub struct TokioHandle(tokio::sync::mpsc::Sender<Task>);
impl TokioHandle {
    fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        if self.0.blocking_send(Box::pin(task)).is_err() {
            tracing::error!("Tokio thread has shut down; dropping task");
        }
    }
}
impl TokioThread {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (tokio_tx, mut tokio_rx) = tokio::sync::mpsc::channel::<Task>(100);
        let tokio = TokioHandle(tokio_tx);

        // Create a thread for background processing
        let tokio_thread_handle = std::thread::Builder::new()
            .name("sonance-tokio".to_string())
            .spawn(move || {
                runtime.block_on(async {
                    while let Some(task) = tokio_rx.recv().await {
                        tokio::spawn(task);
                    }
                });
            })?;

        Ok(Self {
            tokio,
            _tokio_thread_handle: tokio_thread_handle,
        })
    }

    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        self.tokio.spawn(task);
    }
}
