use glide_engine::{Candidate, CaptureSession, DecoderConfig, Rect, SwipeDecoder};

/// Owns the decoder and the stroke in flight. The UI feeds raw screen
/// coordinates; the capture session normalises them through the on-screen
/// keyboard rectangle.
pub struct EngineBackend {
    decoder: SwipeDecoder,
    session: CaptureSession,
}

impl EngineBackend {
    pub fn new() -> Self {
        const DICT_TEXT: &str = include_str!("../../../word_freq.txt");
        let decoder = SwipeDecoder::from_frequency_text(DICT_TEXT, DecoderConfig::default())
            .expect("embedded lexicon is sorted after dedup");
        Self {
            decoder,
            session: CaptureSession::new(Rect::new(0.0, 0.0, 1.0, 1.0)),
        }
    }

    pub fn decoder(&self) -> &SwipeDecoder {
        &self.decoder
    }

    /// Start a stroke; a fresh session replaces whatever was in flight,
    /// which also tracks the current keyboard rectangle on screen.
    pub fn press(&mut self, keyboard: Rect, x: f32, y: f32, t: f64) {
        self.session = CaptureSession::new(keyboard);
        self.session.begin(x, y, t);
    }

    pub fn drag(&mut self, x: f32, y: f32, t: f64) {
        self.session.update(x, y, t);
    }

    /// Finish the stroke and decode it against the current context.
    pub fn release(&mut self, x: f32, y: f32, t: f64, context: &str) -> Vec<Candidate> {
        let gesture = self.session.end(x, y, t);
        self.decoder.decode(&gesture, context)
    }
}

impl Default for EngineBackend {
    fn default() -> Self {
        Self::new()
    }
}
