//! Saved queries the user can load back onto the canvas.

use crate::errors::QueryError;
use chrono::NaiveDate;
use querycanvas_core::{
    DEFAULT_RELATIONSHIP_TYPE, EdgeEntity, EdgeId, NodeEntity, NodeId, Position, PropertyValue,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub nodes: Vec<NodeEntity>,
    pub edges: Vec<EdgeEntity>,
}

pub fn find_template<'a>(
    templates: &'a [QueryTemplate],
    id: &str,
) -> Result<&'a QueryTemplate, QueryError> {
    templates
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| QueryError::UnknownTemplate(id.to_string()))
}

fn node(
    id: &str,
    entity_type: &str,
    label: &str,
    color: &str,
    (x, y): (f64, f64),
    properties: &[(&str, PropertyValue)],
) -> NodeEntity {
    let mut node = NodeEntity::new(NodeId::from(id), entity_type, label, color, Position::new(x, y));
    node.properties = properties
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    node
}

/// `relationship` falls back to the default type when the label is not a
/// catalog relationship id.
fn edge(
    id: &str,
    source: &str,
    target: &str,
    relationship: Option<&str>,
    label: &str,
    properties: &[(&str, PropertyValue)],
) -> EdgeEntity {
    let mut edge = EdgeEntity::new(
        EdgeId::from(id),
        NodeId::from(source),
        NodeId::from(target),
        relationship.unwrap_or(DEFAULT_RELATIONSHIP_TYPE),
        label,
    );
    edge.properties = properties
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    edge
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn text(s: &str) -> PropertyValue {
    PropertyValue::from(s)
}

fn num(n: f64) -> PropertyValue {
    PropertyValue::Number(n)
}

pub fn builtin_templates() -> Vec<QueryTemplate> {
    vec![
        QueryTemplate {
            id: "1".into(),
            name: "İnsan ve Ev İlişkisi".into(),
            description: "Bir kişinin yaşadığı ev ve iletişim bilgileri".into(),
            date: date(2025, 1, 7),
            nodes: vec![
                node(
                    "person1",
                    "insan",
                    "İnsan",
                    "#2563eb",
                    (100.0, 100.0),
                    &[
                        ("isim", text("Mehmet")),
                        ("soyisim", text("Yılmaz")),
                        ("yas", num(35.0)),
                        ("tc", text("12345678901")),
                    ],
                ),
                node(
                    "house1",
                    "ev",
                    "Ev",
                    "#22c55e",
                    (300.0, 100.0),
                    &[
                        ("adres", text("İstanbul Kadıköy")),
                        ("kat", num(3.0)),
                        ("oda", num(4.0)),
                        ("tip", text("Daire")),
                    ],
                ),
                node(
                    "phone1",
                    "telefon",
                    "Telefon",
                    "#059669",
                    (500.0, 100.0),
                    &[("telefon", text("0532-123-4567"))],
                ),
            ],
            edges: vec![
                edge(
                    "edge1",
                    "person1",
                    "house1",
                    None,
                    "yasar",
                    &[("baslangic_tarihi", text("2020-01-01")), ("durum", text("Aktif"))],
                ),
                edge(
                    "edge2",
                    "person1",
                    "phone1",
                    Some("sahip"),
                    "sahip",
                    &[("kayit_tarihi", text("2018-05-15"))],
                ),
            ],
        },
        QueryTemplate {
            id: "2".into(),
            name: "Şirket ve Çalışan İlişkisi".into(),
            description: "Kişinin çalıştığı şirket ve banka hesabı bilgileri".into(),
            date: date(2025, 1, 6),
            nodes: vec![
                node(
                    "person2",
                    "insan",
                    "İnsan",
                    "#2563eb",
                    (100.0, 120.0),
                    &[
                        ("isim", text("Ayşe")),
                        ("soyisim", text("Demir")),
                        ("meslek", text("Yazılım Geliştirici")),
                    ],
                ),
                node(
                    "company1",
                    "sirket",
                    "Şirket",
                    "#dc2626",
                    (300.0, 60.0),
                    &[
                        ("sirket_adi", text("TechCorp A.Ş.")),
                        ("sektor", text("Teknoloji")),
                        ("calisan_sayisi", num(250.0)),
                    ],
                ),
                node(
                    "bank1",
                    "banka",
                    "Banka",
                    "#b91c1c",
                    (300.0, 180.0),
                    &[("banka_adi", text("Ziraat Bankası")), ("sube_kodu", text("1234"))],
                ),
            ],
            edges: vec![
                edge(
                    "edge3",
                    "person2",
                    "company1",
                    Some("calisan"),
                    "calisan",
                    &[
                        ("ise_baslama_tarihi", text("2022-03-01")),
                        ("pozisyon", text("Senior Developer")),
                        ("maas", num(15000.0)),
                    ],
                ),
                edge(
                    "edge4",
                    "person2",
                    "bank1",
                    None,
                    "musteri",
                    &[
                        ("hesap_acilis_tarihi", text("2020-01-15")),
                        ("hesap_tipi", text("Vadesiz Mevduat")),
                    ],
                ),
            ],
        },
        QueryTemplate {
            id: "3".into(),
            name: "Aile İlişkileri Ağı".into(),
            description: "İki kişi arasındaki evlilik bağı ve adres bilgileri".into(),
            date: date(2025, 1, 5),
            nodes: vec![
                node(
                    "husband1",
                    "insan",
                    "İnsan",
                    "#2563eb",
                    (100.0, 150.0),
                    &[
                        ("isim", text("Can")),
                        ("soyisim", text("Özkan")),
                        ("yas", num(28.0)),
                        ("cinsiyet", text("Erkek")),
                    ],
                ),
                node(
                    "wife1",
                    "insan",
                    "İnsan",
                    "#2563eb",
                    (350.0, 150.0),
                    &[
                        ("isim", text("Elif")),
                        ("soyisim", text("Özkan")),
                        ("yas", num(26.0)),
                        ("cinsiyet", text("Kadın")),
                    ],
                ),
                node(
                    "city1",
                    "sehir",
                    "Şehir",
                    "#9333ea",
                    (225.0, 50.0),
                    &[
                        ("sehir_adi", text("Ankara")),
                        ("bolge", text("İç Anadolu")),
                        ("nufus", num(5_600_000.0)),
                    ],
                ),
                node(
                    "address1",
                    "adres",
                    "Adres",
                    "#ea580c",
                    (225.0, 250.0),
                    &[
                        ("tam_adres", text("Çankaya Mah. Atatürk Cad. No:15 Ankara")),
                        ("posta_kodu", text("06100")),
                    ],
                ),
            ],
            edges: vec![
                edge(
                    "edge5",
                    "husband1",
                    "wife1",
                    Some("evli"),
                    "evli",
                    &[
                        ("evlilik_tarihi", text("2021-06-15")),
                        ("evlilik_yeri", text("Ankara")),
                        ("cocuk_sayisi", num(1.0)),
                    ],
                ),
                edge(
                    "edge6",
                    "husband1",
                    "city1",
                    None,
                    "yasar",
                    &[("baslangic_tarihi", text("2021-07-01"))],
                ),
                edge(
                    "edge7",
                    "wife1",
                    "city1",
                    None,
                    "yasar",
                    &[("baslangic_tarihi", text("2021-07-01"))],
                ),
                edge(
                    "edge8",
                    "address1",
                    "city1",
                    None,
                    "adresinde",
                    &[("kayit_tarihi", text("2021-07-01"))],
                ),
            ],
        },
    ]
}
