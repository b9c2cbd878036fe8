//! Trigger dispatcher — reacts to named system events.
//!
//! For each incoming event, every active trigger automation subscribed
//! to that event name is considered; its conditions are evaluated
//! against the event payload and, when they all pass, the automation is
//! executed through the scheduler's common execution path.

use std::sync::Arc;

use tokio::sync::broadcast;

use givehub_domain::automation::{AutomationConfig, AutomationKind, evaluate_all};
use givehub_domain::event::Event;
use givehub_domain::id::AutomationId;

use crate::ports::{AutomationRepository, RunLogStore};
use crate::scheduler::Scheduler;

/// Dispatches system events to matching trigger automations.
pub struct TriggerDispatcher<R, S> {
    repo: R,
    scheduler: Arc<Scheduler<R, S>>,
}

impl<R, S> TriggerDispatcher<R, S>
where
    R: AutomationRepository + Send + Sync + 'static,
    S: RunLogStore + Send + Sync + 'static,
{
    /// Create a dispatcher over the given repository and scheduler.
    pub fn new(repo: R, scheduler: Arc<Scheduler<R, S>>) -> Self {
        Self { repo, scheduler }
    }

    /// Process a single event against all active trigger automations.
    ///
    /// Returns the ids of the automations that were executed. Every
    /// per-automation failure is caught and logged; one failing
    /// automation never blocks evaluation of the others.
    pub async fn dispatch(&self, event: &Event) -> Vec<AutomationId> {
        let automations = match self.repo.load_active(AutomationKind::Trigger).await {
            Ok(automations) => automations,
            Err(err) => {
                tracing::error!(event = %event.name, error = %err, "failed to load trigger automations");
                return Vec::new();
            }
        };

        let mut triggered = Vec::new();
        for automation in automations {
            let AutomationConfig::Trigger {
                event: subscribed,
                conditions,
                ..
            } = &automation.config
            else {
                continue;
            };
            if subscribed != &event.name {
                continue;
            }
            if !evaluate_all(conditions, &event.data) {
                tracing::debug!(id = %automation.id, event = %event.name, "conditions did not match");
                continue;
            }

            let id = automation.id;
            match self
                .scheduler
                .execute_automation(automation, event.data.clone())
                .await
            {
                Ok(log) => {
                    tracing::debug!(%id, event = %event.name, status = %log.status, "trigger executed");
                    triggered.push(id);
                }
                Err(err) => {
                    tracing::error!(%id, event = %event.name, error = %err, "trigger automation failed");
                }
            }
        }
        triggered
    }

    /// Consume events from a bus subscription until the bus closes.
    ///
    /// A lagging receiver (events were dropped because this consumer
    /// fell behind) is logged and the loop continues with the next
    /// available event.
    pub async fn run(self, mut receiver: broadcast::Receiver<Event>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.dispatch(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event bus lagged, events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!("event bus closed, trigger dispatcher stopping");
    }
}

impl<R, S> std::fmt::Debug for TriggerDispatcher<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerDispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_executor::ActionExecutor;
    use crate::event_bus::InProcessEventBus;
    use crate::ports::EventPublisher;
    use crate::scheduler::tests::{
        FailingHandler, InMemoryAutomationRepo, InMemoryRunLogStore, StaticHandler, amount_over,
        trigger_automation,
    };
    use givehub_domain::automation::{ActionKind, Automation};
    use givehub_domain::run_log::RunStatus;
    use serde_json::json;

    fn make_dispatcher(
        automations: Vec<Automation>,
        executor: ActionExecutor,
    ) -> TriggerDispatcher<Arc<InMemoryAutomationRepo>, InMemoryRunLogStore> {
        let repo = Arc::new(InMemoryAutomationRepo::with(automations));
        let scheduler = Scheduler::new(
            Arc::clone(&repo),
            InMemoryRunLogStore::default(),
            executor,
        );
        TriggerDispatcher::new(repo, scheduler)
    }

    fn recording_executor() -> ActionExecutor {
        let mut executor = ActionExecutor::new();
        executor.register(
            ActionKind::CreateRecord,
            Arc::new(StaticHandler(json!({"created": true}))),
        );
        executor
    }

    #[tokio::test]
    async fn should_execute_trigger_when_event_and_conditions_match() {
        let automation = trigger_automation("transactionCompleted", vec![amount_over(100)]);
        let id = automation.id;
        let dispatcher = make_dispatcher(vec![automation], recording_executor());

        let event = Event::new("transactionCompleted", json!({"amount": 150}));
        let triggered = dispatcher.dispatch(&event).await;

        assert_eq!(triggered, vec![id]);
        let runs = dispatcher.scheduler.recent_runs(id, 10).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Success);
        assert_eq!(runs[0].input["amount"], 150);
    }

    #[tokio::test]
    async fn should_not_execute_when_conditions_fail() {
        let automation = trigger_automation("transactionCompleted", vec![amount_over(100)]);
        let id = automation.id;
        let dispatcher = make_dispatcher(vec![automation], recording_executor());

        let event = Event::new("transactionCompleted", json!({"amount": 50}));
        let triggered = dispatcher.dispatch(&event).await;

        assert!(triggered.is_empty());
        assert!(dispatcher.scheduler.recent_runs(id, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_not_execute_when_event_name_differs() {
        let automation = trigger_automation("transactionCompleted", vec![]);
        let dispatcher = make_dispatcher(vec![automation], recording_executor());

        let event = Event::new("moduleUpdated", json!({}));
        let triggered = dispatcher.dispatch(&event).await;

        assert!(triggered.is_empty());
    }

    #[tokio::test]
    async fn should_skip_inactive_automations() {
        let mut automation = trigger_automation("transactionCompleted", vec![]);
        automation.is_active = false;
        let dispatcher = make_dispatcher(vec![automation], recording_executor());

        let event = Event::new("transactionCompleted", json!({"amount": 10}));
        assert!(dispatcher.dispatch(&event).await.is_empty());
    }

    #[tokio::test]
    async fn should_execute_all_matching_automations() {
        let first = trigger_automation("donationReceived", vec![]);
        let second = trigger_automation("donationReceived", vec![]);
        let dispatcher = make_dispatcher(vec![first, second], recording_executor());

        let event = Event::new("donationReceived", json!({}));
        let triggered = dispatcher.dispatch(&event).await;

        assert_eq!(triggered.len(), 2);
    }

    #[tokio::test]
    async fn should_not_let_failing_automation_block_the_others() {
        // One automation's action type has a failing handler; the other
        // uses the working one. Both must be evaluated.
        let mut executor = ActionExecutor::new();
        executor.register(
            ActionKind::CreateRecord,
            Arc::new(StaticHandler(json!({"ok": true}))),
        );
        executor.register(
            ActionKind::Webhook,
            Arc::new(FailingHandler(ActionKind::Webhook, "endpoint 500")),
        );

        let mut failing = trigger_automation("donationReceived", vec![]);
        failing.config = givehub_domain::automation::AutomationConfig::Trigger {
            event: "donationReceived".to_string(),
            conditions: vec![],
            actions: vec![givehub_domain::automation::ActionDescriptor::new(
                ActionKind::Webhook,
                json!({}),
            )],
        };
        let healthy = trigger_automation("donationReceived", vec![]);
        let healthy_id = healthy.id;
        let failing_id = failing.id;

        let dispatcher = make_dispatcher(vec![failing, healthy], executor);
        let event = Event::new("donationReceived", json!({}));
        let triggered = dispatcher.dispatch(&event).await;

        // Both ran: the failing one produced an error-status log, which
        // still counts as a dispatched execution.
        assert_eq!(triggered.len(), 2);
        let failing_runs = dispatcher
            .scheduler
            .recent_runs(failing_id, 10)
            .await
            .unwrap();
        assert_eq!(failing_runs[0].status, RunStatus::Error);
        let healthy_runs = dispatcher
            .scheduler
            .recent_runs(healthy_id, 10)
            .await
            .unwrap();
        assert_eq!(healthy_runs[0].status, RunStatus::Success);
    }

    #[tokio::test]
    async fn should_consume_events_from_bus_subscription() {
        let automation = trigger_automation("transactionCompleted", vec![amount_over(100)]);
        let id = automation.id;

        let repo = Arc::new(InMemoryAutomationRepo::with(vec![automation]));
        let scheduler = Scheduler::new(
            Arc::clone(&repo),
            InMemoryRunLogStore::default(),
            recording_executor(),
        );
        let dispatcher = TriggerDispatcher::new(Arc::clone(&repo), Arc::clone(&scheduler));

        let bus = InProcessEventBus::new(16);
        let receiver = bus.subscribe();
        let worker = tokio::spawn(dispatcher.run(receiver));

        bus.publish(Event::new("transactionCompleted", json!({"amount": 250})))
            .await
            .unwrap();

        // Poll until the run lands.
        let deadline = std::time::Duration::from_secs(5);
        let runs = tokio::time::timeout(deadline, async {
            loop {
                let runs = scheduler.recent_runs(id, 1).await.unwrap();
                if !runs.is_empty() {
                    return runs;
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("event should be dispatched");

        assert_eq!(runs[0].status, RunStatus::Success);
        drop(bus);
        worker.await.unwrap();
    }
}
