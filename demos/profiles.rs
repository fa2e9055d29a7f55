//! Assembling a factory from profiles.
//!
//! Run with `RUST_LOG=ferrous_ioc=debug cargo run --example profiles` to see
//! registrations as they happen, and `APP_DEBUG=1` to switch on the debug
//! profile.

use ferrous_ioc::{
    implements, Constructor, DiResult, Factory, FactoryBuilder, FactoryOptions, FactoryProfile, Injectable, Registrar,
    Resolver,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

trait Settings: Send + Sync {
    fn debug(&self) -> bool;
}

trait Repository: Send + Sync {
    fn find(&self, id: u32) -> String;
}

trait Service: Send + Sync {
    fn handle(&self, id: u32) -> String;
}

#[derive(Default)]
struct EnvSettings;
impl Settings for EnvSettings {
    fn debug(&self) -> bool {
        std::env::var("APP_DEBUG").is_ok()
    }
}
impl Injectable for EnvSettings {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::from_default()]
    }
}
implements!(EnvSettings => dyn Settings);

#[derive(Default)]
struct InMemoryRepository;
impl Repository for InMemoryRepository {
    fn find(&self, id: u32) -> String {
        format!("record #{}", id)
    }
}
impl Injectable for InMemoryRepository {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::from_default()]
    }
}
implements!(InMemoryRepository => dyn Repository);

#[derive(Default)]
struct TracingRepository;
impl Repository for TracingRepository {
    fn find(&self, id: u32) -> String {
        tracing::info!(id, "lookup");
        format!("traced record #{}", id)
    }
}
impl Injectable for TracingRepository {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::from_default()]
    }
}
implements!(TracingRepository => dyn Repository);

struct RecordService {
    repository: Arc<dyn Repository>,
}
impl Service for RecordService {
    fn handle(&self, id: u32) -> String {
        self.repository.find(id)
    }
}
impl Injectable for RecordService {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|args| {
            Ok(RecordService {
                repository: args.take::<dyn Repository>()?,
            })
        })
        .param::<dyn Repository>()]
    }
}
implements!(RecordService => dyn Service);

#[derive(Default)]
struct CoreProfile;
impl FactoryProfile for CoreProfile {
    fn construct(&self, registrar: &Registrar<'_>) -> DiResult<()> {
        registrar.add_keyed::<dyn Repository, InMemoryRepository>("memory")?.as_singleton();
        registrar.add::<dyn Service, RecordService>()?;
        Ok(())
    }
}

#[derive(Default)]
struct DebugProfile;
impl FactoryProfile for DebugProfile {
    fn construct(&self, registrar: &Registrar<'_>) -> DiResult<()> {
        registrar.add_keyed::<dyn Repository, TracingRepository>("tracing")?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Factory::new();
    settings.add::<dyn Settings, EnvSettings>()?.as_singleton();
    let debug = settings.get::<dyn Settings>()?.map(|s| s.debug()).unwrap_or(false);

    let factory = FactoryBuilder::with_options(FactoryOptions::from_env())
        .with_profile::<CoreProfile>()?
        .with_profile_if::<DebugProfile, _>(|| debug)?
        .create();

    factory.log(Some(&|message: &str| println!("{}", message)));

    if let Some(service) = factory.get::<dyn Service>()? {
        println!("{}", service.handle(7));
    }
    for repository in factory.get_all::<dyn Repository>()?.unwrap_or_default() {
        println!("{}", repository.find(1));
    }
    Ok(())
}
