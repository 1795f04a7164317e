use chrono::{DateTime, Local};
use log::{debug, error, info};

use crate::client::{FetchError, FETCH_FAILED_NOTICE};
use crate::models::{FieldEdit, Profile, RecommendationBundle};

/// Which half of the window is showing. Derived from whether results are present.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum View {
    Form,
    Results,
}

/// A request the session has committed to: the profile snapshot to send and
/// the generation its completion must carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub profile: Profile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Shown,
    Failed,
    /// The completion belonged to an earlier generation and was dropped.
    Stale,
}

#[derive(Clone, Debug)]
pub struct Results {
    pub bundle: RecommendationBundle,
    pub received_at: DateTime<Local>,
}

/// Profile form and recommendation results for one window.
///
/// `generation` advances on every submit and every reset, so a completion is
/// only accepted while its ticket is the newest one handed out. `in_flight`
/// holds the generation of the one outstanding request; it is cleared only by
/// that request's completion, stale or not.
#[derive(Debug, Default)]
pub struct Session {
    profile: Profile,
    results: Option<Results>,
    in_flight: Option<u64>,
    generation: u64,
    notice: Option<String>,
}

impl Session {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn results(&self) -> Option<&Results> {
        self.results.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn view(&self) -> View {
        if self.results.is_some() {
            View::Results
        } else {
            View::Form
        }
    }

    pub fn update_field(&mut self, edit: FieldEdit) {
        self.profile.apply(edit);
    }

    /// Marks the session busy and hands out a ticket. Returns `None` while a
    /// request is already in flight.
    pub fn begin_submit(&mut self) -> Option<Ticket> {
        if let Some(outstanding) = self.in_flight {
            debug!("submit ignored, generation {} still in flight", outstanding);
            return None;
        }
        self.notice = None;
        self.generation += 1;
        self.in_flight = Some(self.generation);
        info!("submitting profile {:?} (generation {})", self.profile, self.generation);
        Some(Ticket {
            generation: self.generation,
            profile: self.profile,
        })
    }

    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<RecommendationBundle, FetchError>,
    ) -> Outcome {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
        }
        if generation != self.generation {
            debug!(
                "dropping completion for generation {} (current {})",
                generation, self.generation
            );
            return Outcome::Stale;
        }
        match result {
            Ok(bundle) => {
                info!(
                    "received {} workouts and {} meals",
                    bundle.workouts.len(),
                    bundle.nutrition.len()
                );
                self.results = Some(Results {
                    bundle,
                    received_at: Local::now(),
                });
                Outcome::Shown
            }
            Err(e) => {
                error!("Error fetching recommendations: {}", e);
                self.notice = Some(FETCH_FAILED_NOTICE.to_string());
                Outcome::Failed
            }
        }
    }

    /// Back to the form. The profile is kept as it was. A request still in
    /// flight keeps the session busy until it completes, and its result is dropped.
    pub fn reset(&mut self) {
        self.results = None;
        self.generation += 1;
        info!("reset to profile form");
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, NutritionItem, WorkoutItem};
    use reqwest::StatusCode;

    fn bundle() -> RecommendationBundle {
        RecommendationBundle {
            workouts: vec![WorkoutItem {
                name: "HIIT Blast".into(),
                description: "...".into(),
                difficulty: 4,
                duration: 45,
                intensity: None,
            }],
            nutrition: vec![NutritionItem {
                name: "Protein Bowl".into(),
                description: "...".into(),
                calories: 550,
                protein: 40,
                carbs: None,
                fats: None,
            }],
        }
    }

    fn server_error() -> FetchError {
        FetchError::Status {
            url: "http://localhost:8000/recommend".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[test]
    fn starts_on_form_with_defaults() {
        let session = Session::default();
        assert_eq!(session.view(), View::Form);
        assert_eq!(*session.profile(), Profile::default());
        assert!(!session.is_busy());
    }

    #[test]
    fn submit_snapshots_profile_and_sets_busy() {
        let mut session = Session::default();
        session.update_field(FieldEdit::Goal(Goal::MuscleGain));
        let ticket = session.begin_submit().unwrap();
        assert!(session.is_busy());
        assert_eq!(ticket.profile.goal, Goal::MuscleGain);
        assert!(session.begin_submit().is_none());
    }

    #[test]
    fn success_switches_to_results() {
        let mut session = Session::default();
        let ticket = session.begin_submit().unwrap();
        assert_eq!(session.complete(ticket.generation, Ok(bundle())), Outcome::Shown);
        assert_eq!(session.view(), View::Results);
        assert!(!session.is_busy());
        assert_eq!(session.results().unwrap().bundle.card_count(), 2);
    }

    #[test]
    fn failure_keeps_form_and_profile() {
        let mut session = Session::default();
        session.update_field(FieldEdit::Duration(45));
        let before = *session.profile();
        let ticket = session.begin_submit().unwrap();
        assert_eq!(session.complete(ticket.generation, Err(server_error())), Outcome::Failed);
        assert_eq!(session.view(), View::Form);
        assert!(!session.is_busy());
        assert_eq!(*session.profile(), before);
        assert_eq!(session.notice(), Some(FETCH_FAILED_NOTICE));

        session.dismiss_notice();
        assert!(session.notice().is_none());
    }

    #[test]
    fn reset_returns_to_form_with_submitted_profile() {
        let mut session = Session::default();
        session.update_field(FieldEdit::Difficulty(4));
        session.update_field(FieldEdit::Intensity(2));
        let ticket = session.begin_submit().unwrap();
        session.complete(ticket.generation, Ok(bundle()));

        session.reset();
        assert_eq!(session.view(), View::Form);
        assert_eq!(*session.profile(), ticket.profile);
    }

    #[test]
    fn completion_after_reset_is_discarded() {
        let mut session = Session::default();
        let ticket = session.begin_submit().unwrap();
        session.reset();
        assert_eq!(session.complete(ticket.generation, Ok(bundle())), Outcome::Stale);
        assert_eq!(session.view(), View::Form);
        assert!(session.results().is_none());
        assert!(!session.is_busy());
    }

    #[test]
    fn reset_does_not_allow_a_second_request_in_flight() {
        let mut session = Session::default();
        let first = session.begin_submit().unwrap();
        session.reset();
        assert!(session.is_busy());
        assert!(session.begin_submit().is_none());

        assert_eq!(session.complete(first.generation, Err(server_error())), Outcome::Stale);
        assert!(session.notice().is_none());
        let second = session.begin_submit().unwrap();
        assert_eq!(session.complete(second.generation, Ok(bundle())), Outcome::Shown);
    }
}
