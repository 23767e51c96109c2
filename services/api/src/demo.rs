use crate::feed::render_feed;
use crate::infra::{parse_cleared_at, InMemoryMarketplace};
use crate::routes::MarketplaceServices;
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use jobboard::clock::FixedClock;
use jobboard::config::FeedConfig;
use jobboard::error::AppError;
use jobboard::marketplace::applications::{ApplicantId, ApplicationSubmission, JobId};
use jobboard::marketplace::moderation::{EntityKind, ModerationFlag, ModerationTarget};
use jobboard::marketplace::notifications::RawNotification;
use jobboard::session::{Identity, Role, SessionNotifier};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Client-side cleared watermark applied to the final feed (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_cleared_at)]
    pub(crate) cleared_at: Option<DateTime<Utc>>,
    /// Skip the admin moderation portion of the demo.
    #[arg(long)]
    pub(crate) skip_moderation: bool,
}

const DEMO_COMPANY: &str = "acme";

/// Register demo entities and a few notifications. Returns the number of entities registered.
pub(crate) fn seed_demo_data(store: &InMemoryMarketplace, now: DateTime<Utc>) -> usize {
    let entities = [
        (EntityKind::Company, DEMO_COMPANY),
        (EntityKind::Company, "globex"),
        (EntityKind::Job, "job-backend"),
        (EntityKind::Job, "job-design"),
        (EntityKind::User, "freelancer-ana"),
    ];
    for (kind, id) in entities {
        store.register(kind, id);
    }

    let notifications = [
        ("n-1", "Job 'Backend Engineer' viewed 12 times", 26),
        ("n-2", "New applicant for 'Product Designer'", 20),
        ("n-3", "Application updated", 8),
        ("n-4", "Application updated", 3),
    ];
    for (id, message, hours_ago) in notifications {
        store.notify(RawNotification {
            id: id.to_string(),
            recipient_id: DEMO_COMPANY.to_string(),
            message: message.to_string(),
            created_at: now - Duration::hours(hours_ago),
            is_read: false,
        });
    }

    entities.len()
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        cleared_at,
        skip_moderation,
    } = args;

    let now = Utc::now();
    let store = Arc::new(InMemoryMarketplace::default());
    seed_demo_data(&store, now);
    let clock = Arc::new(FixedClock(now));
    let services = MarketplaceServices::new(store, clock, &FeedConfig::default());

    let session = SessionNotifier::new(vec![Box::new(|identity: Option<&Identity>| {
        match identity {
            Some(identity) => println!("\n[session] {} ({})", identity.user_id, identity.role),
            None => println!("\n[session] signed out"),
        }
    })]);

    println!("Job marketplace demo");

    session.sign_in(Identity::new("freelancer-ana", Role::Freelancer));
    let application = match services.applications.submit(ApplicationSubmission {
        job_id: JobId("job-backend".to_string()),
        applicant_id: ApplicantId("freelancer-ana".to_string()),
    }) {
        Ok(record) => record,
        Err(err) => {
            println!("- submission failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- applied to {} as {} (status: {})",
        application.job_id.0, application.id, application.status
    );

    session.sign_in(Identity::new(DEMO_COMPANY, Role::Company));
    for (requested, reason) in [
        ("reviewed", None),
        ("interview", None),
        ("rejected", Some("   ")),
        ("rejected", Some("Role filled internally")),
    ] {
        match services
            .applications
            .update_status(&application.id, requested, reason)
        {
            Ok(record) => match record.rejection_reason {
                Some(reason) => println!("- moved to {} ({reason})", record.status),
                None => println!("- moved to {}", record.status),
            },
            Err(err) => println!("- {requested} refused: {err}"),
        }
    }

    if !skip_moderation {
        session.sign_in(Identity::new("admin-root", Role::Admin));
        let company = ModerationTarget::new(EntityKind::Company, DEMO_COMPANY);
        for flag in [ModerationFlag::Verified, ModerationFlag::Blocked, ModerationFlag::Blocked] {
            match services.moderation.toggle(&company, flag) {
                Ok(outcome) => println!(
                    "- {} {} -> {}",
                    outcome.kind, outcome.flag, outcome.new_value
                ),
                Err(err) => println!("- toggle failed: {err}"),
            }
        }
        let user = ModerationTarget::new(EntityKind::User, "freelancer-ana");
        if let Err(err) = services.moderation.toggle(&user, ModerationFlag::Verified) {
            println!("- {err}");
        }
        match services
            .moderation
            .add_remark(DEMO_COMPANY, "Please upload a business registration document")
        {
            Ok(remark) => println!("- remark recorded for {}", remark.company_id),
            Err(err) => println!("- remark failed: {err}"),
        }
    }

    session.sign_in(Identity::new(DEMO_COMPANY, Role::Company));
    let outcome = services.feed.feed(DEMO_COMPANY, cleared_at);
    println!("Notification feed for {DEMO_COMPANY}");
    print!("{}", render_feed(&outcome.notifications));

    session.sign_out();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard::marketplace::moderation::ModerationStore;
    use jobboard::marketplace::notifications::NotificationSource;

    #[test]
    fn seed_registers_entities_and_notifications() {
        let store = InMemoryMarketplace::default();
        let now = Utc::now();
        assert_eq!(seed_demo_data(&store, now), 5);

        let company = ModerationTarget::new(EntityKind::Company, DEMO_COMPANY);
        assert!(store.flags(&company).is_ok());
        assert_eq!(store.standard(DEMO_COMPANY).expect("standard").len(), 4);
    }

    #[test]
    fn demo_runs_to_completion() {
        run_demo(DemoArgs::default()).expect("demo completes");
    }
}
