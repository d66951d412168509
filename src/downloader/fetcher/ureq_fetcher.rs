use std::io::Read;
use std::time::Duration;

use ureq::{Agent, AgentBuilder};

use super::{FileDownloader, Response};

const CONTENT_DISPOSITION: &str = "Content-Disposition";

pub struct UReqFetcher {
    agent: Agent,
}

impl FileDownloader for UReqFetcher {
    fn fetch(&self, url: &str) -> Response {
        let response = self.agent.get(url).call();

        match response {
            Ok(response) if (200..300).contains(&response.status()) => {
                let content_disposition = response.header(CONTENT_DISPOSITION).map(str::to_string);

                let mut body = Vec::new();

                if response.into_reader().read_to_end(&mut body).is_err() {
                    return Response::invalid_body();
                }

                Response::ok(body, content_disposition)
            }

            Ok(response) => Response::status(response.status()),

            Err(ureq::Error::Status(code, _)) => Response::status(code),

            Err(ureq::Error::Transport(transport)) => Response::network_error(transport.to_string()),
        }
    }
}

impl UReqFetcher {
    /// Redirects are followed with ureq's default limit. Without `timeout` a request
    /// may block forever.
    pub fn new(timeout: Option<Duration>) -> Self {
        let builder = AgentBuilder::new();

        let builder = match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };

        UReqFetcher {
            agent: builder.build(),
        }
    }
}

impl Default for UReqFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}
