use habit_session::{GoalSessionSimulator, SessionSnapshot};

pub const INPUT_PLACEHOLDER: &str = "Tell me what habit you want to build...";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
}

pub struct App {
    pub session: GoalSessionSimulator,
    pub snapshot: SessionSnapshot,
    pub input: String,
    pub input_mode: InputMode,
    /// Highlighted quick-pick chip
    pub chip_cursor: usize,
    /// Lines scrolled up from the newest message; 0 follows the conversation
    pub scroll_offset: usize,
    /// Largest useful `scroll_offset`, known after the last draw
    max_scroll: usize,
    /// Tick counter driving the typing animation
    pub ticks: u64,
}

impl App {
    pub fn new(session: GoalSessionSimulator) -> Self {
        let snapshot = session.snapshot();
        Self {
            session,
            snapshot,
            input: String::new(),
            input_mode: InputMode::Normal,
            chip_cursor: 0,
            scroll_offset: 0,
            max_scroll: usize::MAX,
            ticks: 0,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Input is disabled while the coach is typing
    pub fn input_enabled(&self) -> bool {
        !self.snapshot.awaiting_reply
    }

    pub fn can_send(&self) -> bool {
        self.input_enabled() && !self.input.trim().is_empty()
    }

    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
        self.refresh();
    }

    /// Re-read session state after an operation or a delivered reply
    pub fn refresh(&mut self) {
        let snapshot = self.session.snapshot();
        if snapshot.transcript.len() != self.snapshot.transcript.len() {
            self.scroll_to_bottom();
        }
        self.snapshot = snapshot;
        let chips = self.session.suggestions().len();
        if self.chip_cursor >= chips {
            self.chip_cursor = 0;
        }
    }

    pub fn push_input(&mut self, c: char) {
        if self.input_enabled() {
            self.input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn send_message(&mut self) {
        if !self.can_send() {
            return;
        }
        if self.session.submit_user_message(&self.input).is_some() {
            self.input.clear();
        }
        self.refresh();
    }

    pub fn chips_visible(&self) -> bool {
        self.snapshot.suggestions_visible()
    }

    pub fn next_chip(&mut self) {
        let count = self.session.suggestions().len();
        if count > 0 {
            self.chip_cursor = (self.chip_cursor + 1) % count;
        }
    }

    pub fn prev_chip(&mut self) {
        let count = self.session.suggestions().len();
        if count > 0 {
            self.chip_cursor = (self.chip_cursor + count - 1) % count;
        }
    }

    pub fn pick_chip(&mut self) {
        if !self.chips_visible() || !self.input_enabled() {
            return;
        }
        let label = match self.session.suggestions().get(self.chip_cursor) {
            Some(label) => label.clone(),
            None => return,
        };
        self.session.select_suggestion(&label);
        self.refresh();
    }

    pub fn jump_to_stage(&mut self, n: i64) {
        self.session.jump_to_stage(n);
        self.refresh();
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1).min(self.max_scroll);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(10).min(self.max_scroll);
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(10);
    }

    /// Record how far the rendered transcript can scroll and clamp to it
    pub fn set_max_scroll(&mut self, max: usize) {
        self.max_scroll = max;
        self.scroll_offset = self.scroll_offset.min(max);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn quit(&mut self) {
        self.session.shutdown();
    }
}
