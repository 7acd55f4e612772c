pub mod http;

pub use http::{Method, RemoteClient, ReqwestRemote};
