use std::cell::RefCell;
use std::time::Instant;

use super::{FileDownloader, Response};

pub struct MockFetcher {
    responses: RefCell<Vec<Response>>,
    requests: RefCell<Vec<(String, Instant)>>,
}

impl FileDownloader for MockFetcher {
    fn fetch(&self, url: &str) -> Response {
        self.requests
            .borrow_mut()
            .push((url.to_string(), Instant::now()));

        let mut responses = self.responses.borrow_mut();

        if responses.is_empty() {
            Response::network_error("no scripted response left")
        } else {
            responses.remove(0)
        }
    }
}

impl MockFetcher {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: RefCell::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn request_instants(&self) -> Vec<Instant> {
        self.requests.borrow().iter().map(|(_, at)| *at).collect()
    }
}
