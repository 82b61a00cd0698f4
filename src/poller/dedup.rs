/// Last texts actually delivered to the chat; owned by the poll loop.
#[derive(Debug, Default)]
pub struct DedupState {
    pub previous_status: String,
    pub previous_error: String,
}

impl DedupState {
    pub fn is_new_status(&self, message: &str) -> bool {
        self.previous_status != message
    }

    pub fn is_new_error(&self, text: &str) -> bool {
        self.previous_error != text
    }
}
