//! Application state and composition.

use std::sync::Arc;

use crate::entities::{Conditions, IndicatorSync};
use crate::infrastructure::{
    app_settings::EngineSettings,
    bridge::HostBridge,
    localization::StaticLocalization,
    ports::{ClockPort, FlagStore, RandomPort},
};
use crate::stores::{SessionStore, UserWriteLocks};
use crate::use_cases::{
    self,
    combat::{AnnounceTurn, DismissCondition},
    conditions::ConditionForm,
    session::ReconcileIndicators,
};

/// Main application state.
///
/// Holds the host bridge, entity modules and use cases.
/// Passed to the host event handler.
pub struct App {
    pub settings: EngineSettings,
    pub bridge: Arc<HostBridge>,
    pub localization: Arc<StaticLocalization>,
    pub session: Arc<SessionStore>,
    pub entities: Entities,
    pub use_cases: UseCases,
}

/// Container for entity modules.
pub struct Entities {
    pub conditions: Arc<Conditions>,
    pub indicators: Arc<IndicatorSync>,
}

/// Container for all use cases.
pub struct UseCases {
    pub conditions: use_cases::ConditionUseCases,
    pub combat: use_cases::CombatUseCases,
    pub session: use_cases::SessionUseCases,
}

impl App {
    pub fn new(
        settings: EngineSettings,
        flags: Arc<dyn FlagStore>,
        bridge: Arc<HostBridge>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let localization = Arc::new(StaticLocalization::new());
        let session = Arc::new(SessionStore::new());

        // Entities
        let indicators = Arc::new(IndicatorSync::new(
            bridge.clone(),
            settings.indicator_icon.clone(),
        ));
        let conditions = Arc::new(
            Conditions::new(
                flags,
                bridge.clone(),
                indicators.clone(),
                random,
                Arc::new(UserWriteLocks::new()),
            )
            .with_flag_location(settings.namespace.clone(), settings.flag_key.clone()),
        );

        // Use cases
        let form = Arc::new(
            ConditionForm::new(conditions.clone(), bridge.clone(), localization.clone())
                .with_defaults(
                    settings.default_label.clone(),
                    settings.default_description.clone(),
                ),
        );
        let announce_turn = Arc::new(
            AnnounceTurn::new(
                conditions.clone(),
                bridge.clone(),
                bridge.clone(),
                localization.clone(),
                clock,
            )
            .with_enabled(settings.announce_turns),
        );
        let dismiss = Arc::new(DismissCondition::new(conditions.clone(), bridge.clone()));
        let reconcile_indicators = Arc::new(ReconcileIndicators::new(
            session.clone(),
            conditions.clone(),
            indicators.clone(),
        ));

        let use_cases = UseCases {
            conditions: use_cases::ConditionUseCases::new(form),
            combat: use_cases::CombatUseCases::new(announce_turn, dismiss),
            session: use_cases::SessionUseCases::new(reconcile_indicators),
        };

        Self {
            settings,
            bridge,
            localization,
            session,
            entities: Entities {
                conditions,
                indicators,
            },
            use_cases,
        }
    }
}
