//! Background narration of flashcards.

use super::{AudioPlayer, SpeechError, SpeechSynthesizer};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};
use wordbook_core::{Language, NarrationPlan, NarrationStep, Voice};

/// Speaks narration plans on a tokio task.
///
/// Starting a plan drops the pending steps of the one still running, so fast
/// navigation never stacks up utterances. An utterance already being spoken
/// finishes first. Failures are logged and dropped.
pub struct Narrator<S> {
    synth: Arc<S>,
    player: Arc<AudioPlayer>,
    voice: Voice,
    /// Held for the length of one utterance.
    speaking: Arc<Mutex<()>>,
    current: Option<JoinHandle<()>>,
}

impl<S: SpeechSynthesizer> Narrator<S> {
    pub fn new(synth: S, player: AudioPlayer, voice: Voice) -> Self {
        Self {
            synth: Arc::new(synth),
            player: Arc::new(player),
            voice,
            speaking: Arc::new(Mutex::new(())),
            current: None,
        }
    }

    pub fn play_plan(&mut self, plan: NarrationPlan) {
        self.stop();
        if plan.is_empty() {
            return;
        }

        let synth = Arc::clone(&self.synth);
        let player = Arc::clone(&self.player);
        let speaking = Arc::clone(&self.speaking);
        let voice = self.voice;
        self.current = Some(tokio::spawn(run_plan(synth, player, speaking, voice, plan)));
    }

    /// Speak one piece of text right away.
    pub fn speak(&mut self, text: &str, language: Language) {
        self.play_plan(NarrationPlan {
            steps: vec![NarrationStep {
                delay: std::time::Duration::ZERO,
                text: text.to_string(),
                language,
            }],
        });
    }

    /// Drop the pending steps of the running plan.
    pub fn stop(&mut self) {
        if let Some(task) = self.current.take() {
            task.abort();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.current.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl<S> Drop for Narrator<S> {
    fn drop(&mut self) {
        if let Some(task) = self.current.take() {
            task.abort();
        }
    }
}

/// Speak each step once its delay from the start has passed.
///
/// Every utterance runs on its own task holding `speaking`, so aborting the
/// plan stops the steps still waiting but not the one being spoken.
pub(crate) async fn run_plan<S: SpeechSynthesizer>(
    synth: Arc<S>,
    player: Arc<AudioPlayer>,
    speaking: Arc<Mutex<()>>,
    voice: Voice,
    plan: NarrationPlan,
) {
    let start = Instant::now();
    for step in plan.steps {
        sleep_until(start + step.delay).await;
        let turn = Arc::clone(&speaking).lock_owned().await;

        let synth = Arc::clone(&synth);
        let player = Arc::clone(&player);
        let utterance = tokio::spawn(async move {
            let _turn = turn;
            debug!(text = %step.text, language = step.language.code(), "narrating");
            if let Err(e) = speak_step(synth.as_ref(), &player, voice, &step).await {
                warn!(error = %e, text = %step.text, "narration failed");
            }
        });
        if let Err(e) = utterance.await {
            warn!(error = %e, "narration task failed");
        }
    }
}

async fn speak_step<S: SpeechSynthesizer>(
    synth: &S,
    player: &AudioPlayer,
    voice: Voice,
    step: &NarrationStep,
) -> Result<(), SpeechError> {
    let audio = synth.synthesize(&step.text, voice, step.language).await?;

    let mut file = tempfile::Builder::new()
        .prefix("wordbook-")
        .suffix(".mp3")
        .tempfile()?;
    file.write_all(&audio)?;
    file.flush()?;

    player.play(file.path()).await
}
