//! Framework-neutral streaming download.
//!
//! Web layers map this onto their own streaming body type: set the headers,
//! then forward `body` chunk by chunk.

use crate::stream::DumpIter;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";

pub struct StreamingResponse {
    pub content_type: &'static str,
    /// `attachment; filename="<name>.<ext>"` when a filename was suggested.
    pub content_disposition: Option<String>,
    pub body: DumpIter,
}

impl StreamingResponse {
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![(CONTENT_TYPE, self.content_type.to_string())];
        if let Some(cd) = &self.content_disposition {
            headers.push((CONTENT_DISPOSITION, cd.clone()));
        }
        headers
    }

    pub fn into_body(self) -> DumpIter {
        self.body
    }
}
