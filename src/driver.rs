//! Fixed-rate cooperative driver
//!
//! Converts variable frame times into fixed `SIM_DT` ticks, forwards sound
//! cues to the audio collaborator, and persists the high score when a run
//! ends. Ticks never overlap: each frame runs its substeps to completion.

use crate::GameCore;
use crate::audio::AudioSink;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScoreStore;

/// Runs one game core at a fixed cadence
pub struct Driver<G: GameCore> {
    core: G,
    audio: Box<dyn AudioSink>,
    store: Box<dyn HighScoreStore>,
    accumulator: f32,
    paused: bool,
    /// Core reported game over or win at the end of the last frame
    finished: bool,
    ticks: u64,
}

impl<G: GameCore> Driver<G> {
    /// Wrap a core, seeding its high score from the store
    pub fn new(mut core: G, audio: Box<dyn AudioSink>, store: Box<dyn HighScoreStore>) -> Self {
        let saved = store.load(core.high_score_key());
        core.restore_high_score(saved);
        log::info!("Driver ready ({} = {})", core.high_score_key(), saved);
        Self {
            core,
            audio,
            store,
            accumulator: 0.0,
            paused: false,
            finished: false,
            ticks: 0,
        }
    }

    pub fn core(&self) -> &G {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut G {
        &mut self.core
    }

    pub fn store(&self) -> &dyn HighScoreStore {
        self.store.as_ref()
    }

    /// Total ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Forward one resolved input to the core
    pub fn input(&mut self, input: G::Input) {
        if !self.paused {
            self.core.handle_input(input);
        }
    }

    /// Advance by one frame of `frame_dt` seconds. Returns ticks run.
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        if self.paused {
            return 0;
        }

        let frame_dt = if frame_dt.is_nan() || frame_dt < 0.0 {
            0.0
        } else {
            frame_dt
        };
        if frame_dt > MAX_FRAME_DT {
            log::warn!("Frame took {:.0} ms, clamping", frame_dt * 1000.0);
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.core.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Time we could not catch up on is dropped, not carried
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        self.ticks += substeps as u64;

        for cue in self.core.drain_sounds() {
            self.audio.play(cue);
        }

        // Save once per finished run; a restarted core arms the next save
        let finished = self.core.is_game_over() || self.core.is_won();
        if finished && !self.finished {
            self.persist_high_score();
        }
        self.finished = finished;

        substeps
    }

    /// Save the core's high score under its key
    pub fn persist_high_score(&mut self) {
        let key = self.core.high_score_key();
        self.store.save(key, self.core.high_score());
    }

    /// Stop scheduling ticks
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.core.pause();
        self.persist_high_score();
    }

    /// Restart scheduling; the core decides what a resume resets
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.accumulator = 0.0;
        self.core.resume();
    }

    /// Give the core back, persisting its high score first
    pub fn into_core(mut self) -> G {
        self.persist_high_score();
        self.core
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::{NullAudio, SoundEffect};
    use crate::highscores::MemoryStore;

    /// Minimal core that counts ticks
    #[derive(Default)]
    struct Counter {
        ticks: u32,
        last_dt: f32,
        inputs: Vec<i32>,
        over_after: Option<u32>,
        high: u64,
        paused: bool,
    }

    impl GameCore for Counter {
        type Input = i32;
        type Snapshot = u32;

        fn tick(&mut self, dt: f32) {
            self.ticks += 1;
            self.last_dt = dt;
        }
        fn handle_input(&mut self, input: i32) {
            self.inputs.push(input);
        }
        fn renderables(&self) -> u32 {
            self.ticks
        }
        fn is_game_over(&self) -> bool {
            self.over_after.is_some_and(|n| self.ticks >= n)
        }
        fn is_won(&self) -> bool {
            false
        }
        fn score(&self) -> u64 {
            self.ticks as u64
        }
        fn high_score(&self) -> u64 {
            self.high.max(self.ticks as u64)
        }
        fn restore_high_score(&mut self, high_score: u64) {
            self.high = self.high.max(high_score);
        }
        fn high_score_key(&self) -> &'static str {
            "counter"
        }
        fn drain_sounds(&mut self) -> Vec<SoundEffect> {
            vec![SoundEffect::Shoot]
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn resume(&mut self) {
            self.paused = false;
        }
    }

    struct SharedAudio(Rc<RefCell<Vec<SoundEffect>>>);

    impl AudioSink for SharedAudio {
        fn play(&mut self, effect: SoundEffect) {
            self.0.borrow_mut().push(effect);
        }
    }

    fn driver(core: Counter) -> Driver<Counter> {
        Driver::new(core, Box::new(NullAudio), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_accumulator_runs_fixed_steps() {
        let mut d = driver(Counter::default());
        assert_eq!(d.frame(SIM_DT * 0.5), 0);
        assert_eq!(d.frame(SIM_DT * 0.6), 1);
        assert_eq!(d.frame(SIM_DT * 2.0), 2);
        assert_eq!(d.core().last_dt, SIM_DT);
        assert_eq!(d.ticks(), 3);
    }

    #[test]
    fn test_stall_is_clamped_to_max_substeps() {
        let mut d = driver(Counter::default());
        assert_eq!(d.frame(10.0), MAX_SUBSTEPS);
        assert_eq!(d.frame(-3.0), 0);
        assert_eq!(d.frame(f32::NAN), 0);
    }

    #[test]
    fn test_pause_blocks_ticks_and_input() {
        let mut d = driver(Counter::default());
        d.pause();
        assert!(d.core().paused);
        assert_eq!(d.frame(0.05), 0);
        d.input(7);
        assert!(d.core().inputs.is_empty());
        d.resume();
        assert!(!d.core().paused);
        d.input(7);
        assert_eq!(d.core().inputs, vec![7]);
    }

    #[test]
    fn test_sounds_are_forwarded() {
        let cues = Rc::new(RefCell::new(Vec::new()));
        let mut d = Driver::new(
            Counter::default(),
            Box::new(SharedAudio(cues.clone())),
            Box::new(MemoryStore::new()),
        );
        d.frame(SIM_DT);
        assert_eq!(cues.borrow().as_slice(), &[SoundEffect::Shoot]);
    }

    #[test]
    fn test_high_score_restored_and_persisted_on_game_over() {
        let mut store = MemoryStore::new();
        store.save("counter", 2);
        let core = Counter {
            over_after: Some(5),
            ..Default::default()
        };
        let mut d = Driver::new(core, Box::new(NullAudio), Box::new(store));
        assert_eq!(d.core().high, 2);

        for _ in 0..6 {
            d.frame(SIM_DT);
        }
        assert!(d.store().load("counter") >= 5);
    }

    #[test]
    fn test_each_finished_run_is_persisted() {
        let core = Counter {
            over_after: Some(2),
            ..Default::default()
        };
        let mut d = driver(core);
        d.frame(SIM_DT);
        d.frame(SIM_DT);
        assert_eq!(d.store().load("counter"), 2);

        // Host restarts the run on the same driver
        d.core_mut().over_after = Some(5);
        d.frame(SIM_DT);
        assert_eq!(d.store().load("counter"), 2);
        d.frame(SIM_DT);
        d.frame(SIM_DT);
        assert_eq!(d.store().load("counter"), 5);
    }
}
