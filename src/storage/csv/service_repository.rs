use anyhow::{Context, Result};
use chrono::DateTime;
use csv::Reader;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufReader;

use super::connection::CsvConnection;
use crate::domain::models::{Service, ServiceCategory, ServiceKind};
use crate::storage::traits::ServiceStorage;

const HEADER: &[&str] = &[
    "code",
    "name",
    "category",
    "kind",
    "default_price",
    "default_cost",
    "default_partner_fee",
    "active",
    "created_at",
];

/// CSV-based service catalog repository.
#[derive(Clone)]
pub struct ServiceRepository {
    connection: CsvConnection,
}

impl ServiceRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_services(&self) -> Result<Vec<Service>> {
        let file_path = self.connection.services_file_path();
        self.connection.ensure_file_exists(&file_path, HEADER)?;

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut services = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let code = record.get(0).unwrap_or("").to_string();

            services.push(Service {
                name: record.get(1).unwrap_or("").to_string(),
                category: ServiceCategory::parse(record.get(2).unwrap_or(""))
                    .map_err(anyhow::Error::msg)?,
                kind: ServiceKind::parse(record.get(3).unwrap_or(""))
                    .map_err(anyhow::Error::msg)?,
                default_price: parse_decimal(record.get(4), "default_price", &code)?,
                default_cost: parse_decimal(record.get(5), "default_cost", &code)?,
                default_partner_fee: parse_decimal(record.get(6), "default_partner_fee", &code)?,
                active: record.get(7).unwrap_or("") == "true",
                created_at: DateTime::parse_from_rfc3339(record.get(8).unwrap_or(""))
                    .with_context(|| format!("Invalid created_at for service {}", code))?,
                code,
            });
        }

        Ok(services)
    }

    fn write_services(&self, services: &[Service]) -> Result<()> {
        let file_path = self.connection.services_file_path();
        let mut csv_writer = csv::Writer::from_path(&file_path)?;

        csv_writer.write_record(HEADER)?;
        for service in services {
            csv_writer.write_record([
                service.code.clone(),
                service.name.clone(),
                service.category.as_str().to_string(),
                service.kind.as_str().to_string(),
                service.default_price.to_string(),
                service.default_cost.to_string(),
                service.default_partner_fee.to_string(),
                service.active.to_string(),
                service.created_at.to_rfc3339(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl ServiceStorage for ServiceRepository {
    fn store_services(&self, services: &[Service]) -> Result<()> {
        let mut all = self.read_services()?;
        all.extend_from_slice(services);
        self.write_services(&all)
    }

    fn get_service(&self, code: &str) -> Result<Option<Service>> {
        let services = self.read_services()?;
        Ok(services.into_iter().find(|s| s.code == code))
    }

    fn list_services(&self) -> Result<Vec<Service>> {
        self.read_services()
    }
}

fn parse_decimal(value: Option<&str>, field: &str, code: &str) -> Result<Decimal> {
    value
        .unwrap_or("")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid {} for service {}", field, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CashDirection;
    use chrono::Utc;

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let repository = ServiceRepository::new(connection.clone());

        let services = vec![
            Service {
                code: "CASH_DEPOSIT".to_string(),
                name: "Cash Deposit".to_string(),
                category: ServiceCategory::Banking,
                kind: ServiceKind::CashMovement(CashDirection::Deposit),
                default_price: Decimal::from(10),
                default_cost: Decimal::ZERO,
                default_partner_fee: Decimal::ZERO,
                active: true,
                created_at: Utc::now().fixed_offset(),
            },
            Service {
                code: "OLD_SERVICE".to_string(),
                name: "Old Service".to_string(),
                category: ServiceCategory::Other,
                kind: ServiceKind::Regular,
                default_price: Decimal::from(5),
                default_cost: Decimal::ONE,
                default_partner_fee: Decimal::ZERO,
                active: false,
                created_at: Utc::now().fixed_offset(),
            },
        ];
        repository.store_services(&services).unwrap();

        let reloaded = ServiceRepository::new(connection);
        let listed = reloaded.list_services().unwrap();
        assert_eq!(listed, services);
        assert_eq!(
            reloaded.get_service("CASH_DEPOSIT").unwrap().unwrap().kind,
            ServiceKind::CashMovement(CashDirection::Deposit)
        );
        assert!(!reloaded.get_service("OLD_SERVICE").unwrap().unwrap().active);
    }
}
