use crate::errors::QueryError;
use crate::request::QueryRequest;
use crate::result::{QueryResult, ResultElement};
use std::future::Future;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(500);

/// Executes a graph query.
pub trait QueryBackend: Send + Sync {
    fn execute(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<QueryResult, QueryError>> + Send;
}

/// Stand-in backend: waits a fixed delay and returns the same fixture for
/// every request.
#[derive(Debug, Clone)]
pub struct MockQueryBackend {
    delay: Duration,
    result: QueryResult,
}

impl Default for MockQueryBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_DELAY)
    }
}

impl MockQueryBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            result: fixture_result(),
        }
    }

    pub fn with_result(delay: Duration, result: QueryResult) -> Self {
        Self { delay, result }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl QueryBackend for MockQueryBackend {
    async fn execute(&self, request: &QueryRequest) -> Result<QueryResult, QueryError> {
        info!(
            nodes = request.nodes.len(),
            edges = request.edges.len(),
            result_limit = request.result_limit,
            query_depth = request.query_depth,
            delay_ms = self.delay.as_millis() as u64,
            "Running mock query"
        );
        tokio::time::sleep(self.delay).await;
        Ok(self.result.clone())
    }
}

const PERSON: &str = "#2563eb";
const PLATE: &str = "#f59e42";
const HOUSE: &str = "#22c55e";
const PLACE: &str = "#a21caf";

/// Seven nodes and eight edges across all four entity types.
pub fn fixture_result() -> QueryResult {
    QueryResult {
        elements: vec![
            ResultElement::node(
                "n1",
                "Ahmet Yılmaz",
                "insan",
                PERSON,
                &[("TC", "12345678901"), ("Yaş", "35"), ("Meslek", "Mühendis"), ("Cinsiyet", "Erkek")],
            ),
            ResultElement::node(
                "n2",
                "34ABC123",
                "plaka",
                PLATE,
                &[("Renk", "Beyaz"), ("Marka", "BMW"), ("Model", "320i"), ("Yıl", "2020")],
            ),
            ResultElement::node(
                "n3",
                "Villa Residence",
                "ev",
                HOUSE,
                &[
                    ("Adres", "Atatürk Cad. No:15"),
                    ("Kat", "3"),
                    ("Oda", "4+1"),
                    ("M²", "180"),
                    ("Tip", "Villa"),
                ],
            ),
            ResultElement::node(
                "n4",
                "Beşiktaş",
                "konum",
                PLACE,
                &[("İl", "İstanbul"), ("İlçe", "Beşiktaş"), ("Mahalle", "Çırağan"), ("Posta", "34349")],
            ),
            ResultElement::node(
                "n5",
                "Ayşe Demir",
                "insan",
                PERSON,
                &[("TC", "98765432109"), ("Yaş", "28"), ("Meslek", "Doktor"), ("Cinsiyet", "Kadın")],
            ),
            ResultElement::node(
                "n6",
                "06XYZ789",
                "plaka",
                PLATE,
                &[("Renk", "Siyah"), ("Marka", "Mercedes"), ("Model", "C200"), ("Yıl", "2019")],
            ),
            ResultElement::node(
                "n7",
                "Modern Apt",
                "ev",
                HOUSE,
                &[
                    ("Adres", "Cumhuriyet Mah. Sok:8"),
                    ("Kat", "7"),
                    ("Oda", "2+1"),
                    ("M²", "120"),
                    ("Tip", "Daire"),
                ],
            ),
            ResultElement::edge("n1", "n2", "Sahip"),
            ResultElement::edge("n2", "n3", "Kayıtlı"),
            ResultElement::edge("n3", "n4", "Bulunduğu"),
            ResultElement::edge("n5", "n2", "Kullanıcı"),
            ResultElement::edge("n5", "n6", "Sahip"),
            ResultElement::edge("n6", "n7", "Kayıtlı"),
            ResultElement::edge("n7", "n4", "Bulunduğu"),
            ResultElement::edge("n1", "n5", "Tanıyor"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::QueryParams;

    #[tokio::test]
    async fn test_mock_waits_then_returns_fixture() {
        let delay = Duration::from_millis(20);
        let backend = MockQueryBackend::new(delay);
        let request = QueryRequest::new(&[], &[], QueryParams::default());
        let started = std::time::Instant::now();
        let result = backend.execute(&request).await.unwrap();
        assert!(started.elapsed() >= delay);
        assert_eq!(result.nodes().count(), 7);
        assert_eq!(result.edges().count(), 8);
    }

    #[test]
    fn test_fixture_address_keeps_inner_colon() {
        let result = fixture_result();
        let villa = result.nodes().find(|n| n.id == "n3").unwrap();
        let props = crate::result::parse_properties(villa.properties.as_deref().unwrap());
        assert_eq!(props["Adres"], "Atatürk Cad. No:15");
    }
}
