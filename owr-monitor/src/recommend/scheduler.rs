//! Recommendation cycle and its timer

use super::{build_prompt, parse_recommendation, LanguageModel, RecommendError, SensorRole};
use chrono::{Local, Utc};
use owr_common::db::{readings, recommendations, NewRecommendation, Recommendation, StoredReading};
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// One prompt → model → parse → persist pass
pub struct RecommendationEngine<M> {
    db: SqlitePool,
    model: M,
    indoor_device_model: String,
    outdoor_device_model: String,
}

impl<M: LanguageModel> RecommendationEngine<M> {
    pub fn new(
        db: SqlitePool,
        model: M,
        indoor_device_model: impl Into<String>,
        outdoor_device_model: impl Into<String>,
    ) -> Self {
        Self {
            db,
            model,
            indoor_device_model: indoor_device_model.into(),
            outdoor_device_model: outdoor_device_model.into(),
        }
    }

    /// Run one recommendation cycle
    ///
    /// Any failure abandons the cycle; nothing is persisted in that case.
    pub async fn run_cycle(&self) -> Result<Recommendation, RecommendError> {
        let indoor = self.latest_reading(SensorRole::Indoor).await?;
        let outdoor = self.latest_reading(SensorRole::Outdoor).await?;

        let prompt = build_prompt(&indoor, &outdoor, Local::now());
        debug!(%prompt, "Recommendation prompt");

        let text = self.model.generate(&prompt).await?;
        let reply = parse_recommendation(&text)?;

        let new = NewRecommendation {
            time: Utc::now(),
            should_run_cooling: reply.should_operate_air_conditioner,
            target_temperature_f: reply.temperature_to_set_air_conditioner_in_f,
            should_open_window: reply.should_window_be_open,
            narrative: reply.weather_description,
            indoor_temperature_f: indoor.temperature_f,
            outdoor_temperature_f: outdoor.temperature_f,
        };
        let id = recommendations::insert_recommendation(&self.db, &new).await?;

        Ok(new.into_recommendation(id))
    }

    async fn latest_reading(&self, role: SensorRole) -> Result<StoredReading, RecommendError> {
        let device_model = match role {
            SensorRole::Indoor => &self.indoor_device_model,
            SensorRole::Outdoor => &self.outdoor_device_model,
        };

        readings::latest_for_device(&self.db, device_model)
            .await?
            .ok_or_else(|| RecommendError::MissingReading {
                role,
                device_model: device_model.clone(),
            })
    }
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    /// Last cycle failed; cleared by the next successful one
    Failed,
}

/// Runs the engine immediately and then every `interval`, forever
pub struct RecommendationScheduler<M> {
    engine: RecommendationEngine<M>,
    interval: Duration,
    state: SchedulerState,
    cycles_run: u64,
    cycles_failed: u64,
}

impl<M: LanguageModel> RecommendationScheduler<M> {
    pub fn new(engine: RecommendationEngine<M>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            state: SchedulerState::Idle,
            cycles_run: 0,
            cycles_failed: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    pub fn cycles_failed(&self) -> u64 {
        self.cycles_failed
    }

    /// Run one cycle and log the outcome
    pub async fn tick(&mut self) -> Option<Recommendation> {
        self.state = SchedulerState::Running;
        self.cycles_run += 1;

        match self.engine.run_cycle().await {
            Ok(rec) => {
                self.state = SchedulerState::Idle;
                info!(
                    id = rec.id,
                    "Recommendation: AC={}, Temp={}°F, Window={}",
                    rec.should_run_cooling,
                    rec.target_temperature_f,
                    rec.should_open_window
                );
                Some(rec)
            }
            Err(e) => {
                self.state = SchedulerState::Failed;
                self.cycles_failed += 1;
                warn!(
                    cycles_failed = self.cycles_failed,
                    cycles_run = self.cycles_run,
                    "Recommendation cycle failed: {}",
                    e
                );
                None
            }
        }
    }

    /// Loop forever; the first cycle runs without waiting
    pub async fn run(mut self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Recommendation scheduler started"
        );

        let mut timer = interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;
            self.tick().await;
        }
    }
}
