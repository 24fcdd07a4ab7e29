mod request;
mod thread;

pub use request::InferenceRequest;
pub use thread::inference_thread;
