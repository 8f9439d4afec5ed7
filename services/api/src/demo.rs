use chrono::{Duration, Local, Months, NaiveDate};
use clap::Args;
use lease_keeper::calendar;
use lease_keeper::domain::{
    Address, Housing, HousingId, Key, LeaseId, Tenant, TenantId, TenantStatus,
};
use lease_keeper::error::AppError;
use lease_keeper::lifecycle::LeaseDraft;
use lease_keeper::live;
use lease_keeper::repository::{HousingRepository, LeaseRepository, TenantRepository};
use lease_keeper::router::IndexationReport;
use lease_keeper::store::InMemoryStore;
use lease_keeper::LeaseKeeper;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct IndexationReportArgs {
    /// Reference date for the schedule (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for the walkthrough (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Identifiers of the records seeded into a fresh store.
#[derive(Debug, Clone, Default)]
pub(crate) struct DemoPortfolio {
    pub(crate) housings: Vec<HousingId>,
    pub(crate) tenants: Vec<TenantId>,
    pub(crate) leases: Vec<LeaseId>,
}

fn address(number: &str, street: &str, zip_code: &str, city: &str) -> Address {
    Address {
        street: street.to_string(),
        number: number.to_string(),
        zip_code: zip_code.to_string(),
        city: city.to_string(),
        country: "France".to_string(),
    }
}

fn demo_housings() -> Vec<Housing> {
    vec![
        Housing {
            address: address("12", "Rue des Lilas", "69003", "Lyon"),
            rent_cents: 85_000,
            charges_cents: 12_000,
            deposit_cents: 170_000,
            ..Housing::default()
        },
        Housing {
            address: address("4", "Place du Marché", "69100", "Villeurbanne"),
            rent_cents: 64_000,
            charges_cents: 8_000,
            deposit_cents: 128_000,
            ..Housing::default()
        },
        Housing {
            address: address("27", "Quai Perrache", "69002", "Lyon"),
            ..Housing::default()
        },
    ]
}

fn demo_tenants() -> Vec<Tenant> {
    let tenant = |first_name: &str, last_name: &str, email: &str, status| Tenant {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: Some(email.to_string()),
        status,
        ..Tenant::default()
    };

    vec![
        tenant("Camille", "Martin", "camille.martin@example.com", TenantStatus::Active),
        tenant("Jordan", "Lefevre", "jordan.lefevre@example.com", TenantStatus::Active),
        tenant("Sasha", "Bernard", "sasha.bernard@example.com", TenantStatus::Prospect),
    ]
}

fn entrance_keys() -> Vec<Key> {
    vec![
        Key {
            kind: "entrance".to_string(),
            label: Some("main door".to_string()),
            ..Key::default()
        },
        Key {
            kind: "mailbox".to_string(),
            ..Key::default()
        },
    ]
}

/// Seeds three housings, three tenants and two active leases whose anniversaries fall
/// 20 and 145 days after `today`.
pub(crate) async fn seed_demo_portfolio<S>(
    keeper: &LeaseKeeper<S>,
    today: NaiveDate,
) -> Result<DemoPortfolio, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let mut portfolio = DemoPortfolio::default();
    for housing in demo_housings() {
        portfolio
            .housings
            .push(keeper.housings.create_housing(housing).await?);
    }
    for tenant in demo_tenants() {
        portfolio
            .tenants
            .push(keeper.tenants.create_tenant(tenant).await?);
    }

    let seeded = [
        (0, 0, anniversary_start(today, 20, 3), 85_000, 12_000, 5),
        (1, 1, anniversary_start(today, 145, 1), 64_000, 8_000, 1),
    ];
    for (housing, tenant, start, rent, charges, due_day) in seeded {
        let draft = LeaseDraft {
            housing_id: Some(portfolio.housings[housing]),
            tenant_id: Some(portfolio.tenants[tenant]),
            start_date_epoch_day: Some(start),
            rent_cents: rent,
            charges_cents: charges,
            deposit_cents: rent * 2,
            rent_due_day_of_month: due_day,
        };
        portfolio
            .leases
            .push(keeper.leases.create_lease(draft, entrance_keys()).await?);
    }

    Ok(portfolio)
}

/// Start date whose anniversary falls `days_ahead` days after `today`, `years_back` years ago.
fn anniversary_start(today: NaiveDate, days_ahead: i64, years_back: u32) -> i64 {
    (today + Duration::days(days_ahead))
        .checked_sub_months(Months::new(years_back * 12))
        .map(calendar::epoch_day)
        .unwrap_or_else(|| calendar::epoch_day(today))
}

fn demo_keeper() -> LeaseKeeper<InMemoryStore> {
    LeaseKeeper::new(Arc::new(InMemoryStore::new()))
}

async fn indexation_report<S>(
    keeper: &LeaseKeeper<S>,
    today: NaiveDate,
) -> Result<IndexationReport, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let upcoming = live::first_emission(
        keeper
            .indexations
            .observe_upcoming_indexations(calendar::epoch_day(today)),
    )
    .await?;
    Ok(IndexationReport::new(today, upcoming))
}

fn render_indexation_report(report: &IndexationReport) {
    println!("Upcoming rent indexations as of {}", report.today);
    if report.indexations.is_empty() {
        println!("- none");
        return;
    }
    for view in &report.indexations {
        let date = view
            .next_indexation_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "out of range".to_string());
        println!(
            "- lease {} | housing {} | tenant {} | {} (in {} days)",
            view.indexation.lease_id,
            view.indexation.housing_id,
            view.indexation.tenant_id,
            date,
            view.indexation.days_until
        );
    }
}

pub(crate) async fn run_indexation_report(args: IndexationReportArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let keeper = demo_keeper();
    seed_demo_portfolio(&keeper, today).await?;

    let report = indexation_report(&keeper, today).await?;
    if args.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        render_indexation_report(&report);
    }
    Ok(())
}

async fn render_situations<S>(keeper: &LeaseKeeper<S>) -> Result<(), AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let housings = live::current(keeper.housings.observe_housings()).await?;
    for housing in housings {
        let id = housing.id;
        let line = housing.address.one_line();
        let situation =
            live::first_emission(keeper.situations.observe_housing_situation(housing)).await?;
        println!("  - housing {id} {line}: {}", situation.label());
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let today_epoch_day = calendar::epoch_day(today);
    let keeper = demo_keeper();
    let portfolio = seed_demo_portfolio(&keeper, today).await?;

    println!("Lease keeper walkthrough ({today})");
    println!("\nSeeded portfolio");
    render_situations(&keeper).await?;

    let draft_housing = portfolio.housings[2];
    let prospect = portfolio.tenants[2];
    println!("\nSigning a lease for the unconfigured housing {draft_housing}");
    let lease_id = keeper
        .leases
        .create_lease(
            LeaseDraft {
                housing_id: Some(draft_housing),
                tenant_id: Some(prospect),
                start_date_epoch_day: Some(today_epoch_day),
                rent_cents: 72_000,
                charges_cents: 9_000,
                deposit_cents: 144_000,
                rent_due_day_of_month: 10,
            },
            entrance_keys(),
        )
        .await?;
    let keys = live::current(keeper.leases.observe_keys(lease_id)).await?;
    println!("- lease {lease_id} created with {} keys", keys.len());
    render_situations(&keeper).await?;

    println!("\nDeleting housing {draft_housing} while its lease is active");
    match keeper.housings.delete_housing(draft_housing).await {
        Ok(()) => println!("- unexpectedly deleted"),
        Err(err) => println!("- refused: {err}"),
    }

    println!("\nClosing lease {lease_id}");
    keeper.leases.close_lease(lease_id, today_epoch_day).await?;
    render_situations(&keeper).await?;

    keeper.housings.delete_housing(draft_housing).await?;
    println!("- housing {draft_housing} deleted once vacant");

    println!();
    render_indexation_report(&indexation_report(&keeper, today).await?);
    Ok(())
}
