//! Static registry of entity and relationship types.
//!
//! The canvas stamps new nodes with an entity type from this catalog and the
//! property panels render their fields from it. Lookups for unknown type ids
//! fall back to an empty field list rather than failing.

use crate::PropertyValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relationship type given to freshly connected edges.
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Date,
}

impl FieldKind {
    /// Turns raw form input into a stored value.
    ///
    /// Numeric fields coerce to a number (empty input is 0); text that does
    /// not parse yields `None`. Every other kind passes the string through.
    pub fn coerce(self, raw: &str) -> Option<PropertyValue> {
        match self {
            FieldKind::Number => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Some(PropertyValue::Number(0.0))
                } else {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .map(PropertyValue::Number)
                }
            }
            FieldKind::Text | FieldKind::Select | FieldKind::Date => {
                Some(PropertyValue::Text(raw.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldSchema {
    fn new(key: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            options: Vec::new(),
        }
    }

    fn text(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    fn number(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    fn date(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    fn select(key: &str, label: &str, options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            ..Self::new(key, label, FieldKind::Select)
        }
    }
}

/// A palette entry: what the user drags onto the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    pub id: String,
    pub label: String,
    pub color: String,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipType {
    pub id: String,
    pub label: String,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<EntityType>,
    relationships: Vec<RelationshipType>,
    entity_index: HashMap<String, usize>,
    relationship_index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(entities: Vec<EntityType>, relationships: Vec<RelationshipType>) -> Self {
        let entity_index = entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        let relationship_index = relationships
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self {
            entities,
            relationships,
            entity_index,
            relationship_index,
        }
    }

    pub fn entity_types(&self) -> &[EntityType] {
        &self.entities
    }

    pub fn relationship_types(&self) -> &[RelationshipType] {
        &self.relationships
    }

    pub fn entity_type(&self, type_id: &str) -> Option<&EntityType> {
        self.entity_index.get(type_id).map(|&i| &self.entities[i])
    }

    pub fn relationship_type(&self, type_id: &str) -> Option<&RelationshipType> {
        self.relationship_index
            .get(type_id)
            .map(|&i| &self.relationships[i])
    }

    /// Editable fields of an entity type; empty for unknown types.
    pub fn entity_fields(&self, type_id: &str) -> &[FieldSchema] {
        match self.entity_type(type_id) {
            Some(entity) => &entity.fields,
            None => &[],
        }
    }

    /// Editable fields of a relationship type; empty for unknown types.
    pub fn relationship_fields(&self, type_id: &str) -> &[FieldSchema] {
        match self.relationship_type(type_id) {
            Some(relationship) => &relationship.fields,
            None => &[],
        }
    }

    /// Human-readable label used to keep an edge's display label in sync.
    pub fn relationship_label(&self, type_id: &str) -> Option<&str> {
        self.relationship_type(type_id).map(|r| r.label.as_str())
    }

    pub fn entity_color(&self, type_id: &str) -> Option<&str> {
        self.entity_type(type_id).map(|e| e.color.as_str())
    }

    /// The built-in person/vehicle/house/location catalog.
    pub fn builtin() -> Self {
        Self::new(builtin_entities(), builtin_relationships())
    }
}

fn builtin_entities() -> Vec<EntityType> {
    vec![
        EntityType {
            id: "insan".into(),
            label: "İnsan".into(),
            color: "#2563eb".into(),
            fields: vec![
                FieldSchema::text("isim", "İsim"),
                FieldSchema::text("soyisim", "Soyisim"),
                FieldSchema::text("tc", "TC Kimlik"),
                FieldSchema::number("yas", "Yaş"),
                FieldSchema::select("cinsiyet", "Cinsiyet", &["Kadın", "Erkek", "Diğer"]),
                FieldSchema::text("meslek", "Meslek"),
                FieldSchema::text("telefon", "Telefon"),
                FieldSchema::text("email", "Email"),
                FieldSchema::text("dogumyeri", "Doğum Yeri"),
                FieldSchema::select(
                    "medenihal",
                    "Medeni Hal",
                    &["Bekar", "Evli", "Dul", "Boşanmış"],
                ),
                FieldSchema::select(
                    "egitim",
                    "Eğitim Durumu",
                    &[
                        "İlkokul",
                        "Ortaokul",
                        "Lise",
                        "Üniversite",
                        "Yüksek Lisans",
                        "Doktora",
                    ],
                ),
            ],
        },
        EntityType {
            id: "plaka".into(),
            label: "Plaka".into(),
            color: "#f59e42".into(),
            fields: vec![
                FieldSchema::text("plaka", "Plaka"),
                FieldSchema::text("renk", "Renk"),
                FieldSchema::text("marka", "Marka"),
                FieldSchema::text("model", "Model"),
                FieldSchema::number("yil", "Yıl"),
            ],
        },
        EntityType {
            id: "ev".into(),
            label: "Ev".into(),
            color: "#22c55e".into(),
            fields: vec![
                FieldSchema::text("adres", "Adres"),
                FieldSchema::number("kat", "Kat"),
                FieldSchema::number("oda", "Oda Sayısı"),
                FieldSchema::select("tip", "Tip", &["Daire", "Villa", "Müstakil"]),
                FieldSchema::number("metrekare", "Metrekare"),
            ],
        },
        EntityType {
            id: "konum".into(),
            label: "Konum".into(),
            color: "#a21caf".into(),
            fields: vec![
                FieldSchema::text("il", "İl"),
                FieldSchema::text("ilce", "İlçe"),
                FieldSchema::text("mahalle", "Mahalle"),
                FieldSchema::text("koordinat", "Koordinat"),
                FieldSchema::text("posta", "Posta Kodu"),
            ],
        },
    ]
}

fn relationship(id: &str, label: &str, fields: Vec<FieldSchema>) -> RelationshipType {
    RelationshipType {
        id: id.to_string(),
        label: label.to_string(),
        fields,
    }
}

fn builtin_relationships() -> Vec<RelationshipType> {
    vec![
        relationship(
            "arkadas",
            "Arkadaş",
            vec![
                FieldSchema::date("baslangic_tarihi", "Arkadaşlık Başlangıcı"),
                FieldSchema::select(
                    "yakinlik_derecesi",
                    "Yakınlık Derecesi",
                    &["Çok Yakın", "Yakın", "Normal", "Uzak"],
                ),
                FieldSchema::text("ortak_aktiviteler", "Ortak Aktiviteler"),
                FieldSchema::select(
                    "iletisim_sikligi",
                    "İletişim Sıklığı",
                    &["Günlük", "Haftalık", "Aylık", "Nadir"],
                ),
            ],
        ),
        relationship(
            "evli",
            "Evli",
            vec![
                FieldSchema::date("evlilik_tarihi", "Evlilik Tarihi"),
                FieldSchema::text("evlilik_yeri", "Evlilik Yeri"),
                FieldSchema::number("cocuk_sayisi", "Çocuk Sayısı"),
                FieldSchema::select("durum", "Durum", &["Evli", "Ayrı", "Boşanmış"]),
            ],
        ),
        relationship(
            "akraba",
            "Akraba",
            vec![
                FieldSchema::select(
                    "yakinlik_derecesi",
                    "Yakınlık Derecesi",
                    &["1. Derece", "2. Derece", "3. Derece", "Uzak Akraba"],
                ),
                FieldSchema::select(
                    "akrabalik_turu",
                    "Akrabalık Türü",
                    &["Anne-Baba", "Kardeş", "Çocuk", "Amca/Teyze", "Kuzen", "Diğer"],
                ),
                FieldSchema::select(
                    "gorusme_sikligi",
                    "Görüşme Sıklığı",
                    &["Sürekli", "Sık", "Bazen", "Nadir"],
                ),
            ],
        ),
        relationship(
            "calisan",
            "Çalışan",
            vec![
                FieldSchema::date("ise_baslama_tarihi", "İşe Başlama Tarihi"),
                FieldSchema::text("pozisyon", "Pozisyon"),
                FieldSchema::text("departman", "Departman"),
                FieldSchema::number("maas", "Maaş"),
                FieldSchema::select(
                    "istihdam_turu",
                    "İstihdam Türü",
                    &["Tam Zamanlı", "Yarı Zamanlı", "Sözleşmeli", "Stajyer"],
                ),
                FieldSchema::select("durum", "Durum", &["Aktif", "İzinli", "Ayrılmış"]),
            ],
        ),
        relationship(
            "sahip",
            "Sahip",
            vec![
                FieldSchema::number("sahiplik_orani", "Sahiplik Oranı (%)"),
                FieldSchema::date("sahiplik_tarihi", "Sahiplik Tarihi"),
                FieldSchema::select(
                    "sahiplik_turu",
                    "Sahiplik Türü",
                    &["Tam Sahip", "Ortak", "Hissedar", "Yönetici"],
                ),
            ],
        ),
        relationship(
            "arac_sahibi",
            "Araç Sahibi",
            vec![
                FieldSchema::date("sahiplik_tarihi", "Sahiplik Tarihi"),
                FieldSchema::number("satin_alma_fiyati", "Satın Alma Fiyatı"),
                FieldSchema::select(
                    "sigorta_durumu",
                    "Sigorta Durumu",
                    &["Kasko", "Trafik", "Her İkisi", "Sigortasız"],
                ),
                FieldSchema::select(
                    "kullanim_amaci",
                    "Kullanım Amacı",
                    &["Kişisel", "Ticari", "Karma"],
                ),
            ],
        ),
        relationship(
            "oturan",
            "Oturan",
            vec![
                FieldSchema::date("oturma_baslangici", "Oturma Başlangıcı"),
                FieldSchema::number("kira_miktari", "Kira Miktarı"),
                FieldSchema::select(
                    "oturma_turu",
                    "Oturma Türü",
                    &["Kiracı", "Sahip", "Misafir", "Geçici"],
                ),
                FieldSchema::number("oda_sayisi", "Kullandığı Oda Sayısı"),
            ],
        ),
        relationship(
            "bulundu",
            "Bulundu",
            vec![
                FieldSchema::date("tarih_saat", "Tarih-Saat"),
                FieldSchema::number("sure", "Bulunma Süresi (dakika)"),
                FieldSchema::text("aktivite", "Aktivite"),
                FieldSchema::select(
                    "kaynak",
                    "Bilgi Kaynağı",
                    &["GPS", "Kamera", "Tanık", "GSM", "Diğer"],
                ),
            ],
        ),
        relationship(
            "arama_yapti",
            "Arama Yaptı",
            vec![
                FieldSchema::date("arama_tarihi", "Arama Tarihi"),
                FieldSchema::number("sure", "Konuşma Süresi (saniye)"),
                FieldSchema::select("arama_turu", "Arama Türü", &["Giden", "Gelen", "Cevapsız"]),
                FieldSchema::text("konum", "Arama Konumu"),
            ],
        ),
        relationship(
            "mesaj_gonderdi",
            "Mesaj Gönderdi",
            vec![
                FieldSchema::date("mesaj_tarihi", "Mesaj Tarihi"),
                FieldSchema::number("mesaj_uzunlugu", "Mesaj Uzunluğu"),
                FieldSchema::select(
                    "mesaj_turu",
                    "Mesaj Türü",
                    &["SMS", "WhatsApp", "Telegram", "Signal"],
                ),
                FieldSchema::select(
                    "icerik_turu",
                    "İçerik Türü",
                    &["Metin", "Resim", "Video", "Ses", "Dosya"],
                ),
            ],
        ),
        relationship(
            "email_gonderdi",
            "Email Gönderdi",
            vec![
                FieldSchema::date("email_tarihi", "Email Tarihi"),
                FieldSchema::text("konu", "Konu"),
                FieldSchema::select("ek_var_mi", "Ek Var mı?", &["Evet", "Hayır"]),
                FieldSchema::select("oncelik", "Öncelik", &["Yüksek", "Normal", "Düşük"]),
            ],
        ),
        relationship(
            "para_transferi",
            "Para Transferi",
            vec![
                FieldSchema::date("transfer_tarihi", "Transfer Tarihi"),
                FieldSchema::number("miktar", "Miktar"),
                FieldSchema::select("para_birimi", "Para Birimi", &["TL", "USD", "EUR", "GBP"]),
                FieldSchema::select(
                    "transfer_turu",
                    "Transfer Türü",
                    &["Havale", "EFT", "Nakit", "Kredi Kartı"],
                ),
                FieldSchema::text("aciklama", "Açıklama"),
            ],
        ),
        relationship(
            DEFAULT_RELATIONSHIP_TYPE,
            "Genel Bağlantı",
            vec![
                FieldSchema::date("baslangic_tarihi", "Başlangıç Tarihi"),
                FieldSchema::date("bitis_tarihi", "Bitiş Tarihi"),
                FieldSchema::select(
                    "guc_seviyesi",
                    "Güç Seviyesi",
                    &["Çok Güçlü", "Güçlü", "Orta", "Zayıf"],
                ),
                FieldSchema::select(
                    "guvenilirlik",
                    "Güvenilirlik",
                    &["Çok Güvenilir", "Güvenilir", "Orta", "Şüpheli"],
                ),
                FieldSchema::text("notlar", "Notlar"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.entity_types().len(), 4);
        assert_eq!(catalog.entity_fields("insan").len(), 11);
        assert_eq!(catalog.entity_color("plaka"), Some("#f59e42"));
        assert_eq!(catalog.relationship_label("arac_sahibi"), Some("Araç Sahibi"));
        assert_eq!(
            catalog.relationship_label(DEFAULT_RELATIONSHIP_TYPE),
            Some("Genel Bağlantı")
        );
    }

    #[test]
    fn test_unknown_type_falls_back_to_empty_schema() {
        let catalog = Catalog::builtin();
        assert!(catalog.entity_fields("telefon").is_empty());
        assert!(catalog.relationship_fields("yasar").is_empty());
        assert!(catalog.relationship_label("yasar").is_none());
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(
            FieldKind::Number.coerce(""),
            Some(PropertyValue::Number(0.0))
        );
        assert_eq!(
            FieldKind::Number.coerce(" 42 "),
            Some(PropertyValue::Number(42.0))
        );
        assert_eq!(FieldKind::Number.coerce("abc"), None);
        assert_eq!(
            FieldKind::Select.coerce("Evli"),
            Some(PropertyValue::from("Evli"))
        );
    }

    #[test]
    fn test_select_fields_carry_options() {
        let catalog = Catalog::builtin();
        let cinsiyet = catalog
            .entity_fields("insan")
            .iter()
            .find(|f| f.key == "cinsiyet")
            .expect("cinsiyet field");
        assert_eq!(cinsiyet.kind, FieldKind::Select);
        assert_eq!(cinsiyet.options, vec!["Kadın", "Erkek", "Diğer"]);
    }
}
