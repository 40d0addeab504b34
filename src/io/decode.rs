//! Decode Transparency Platform XML responses into market documents.
//!
//! The API answers every query with a single XML document. Data responses
//! use the root tags `Publication_MarketDocument` (flows, day-ahead
//! prices) or `GL_MarketDocument` (generation per type); "no data"
//! acknowledgements use a different root entirely. The root tag is
//! sniffed first and the body is decoded into a closed
//! [`MarketDocument`] variant, so downstream code matches on the tag
//! instead of presence-checking keys.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;

use crate::domain::ValueColumn;
use crate::error::Error;

/// Wire shape of a `<Point>` element.
///
/// Exactly one of the value elements is populated, depending on the
/// document type; callers select it with a [`ValueColumn`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawPoint {
    pub position: u32,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(rename = "price.amount", default)]
    pub price_amount: Option<String>,
}

impl RawPoint {
    /// The raw decimal text under the selected value column, if present.
    pub fn value(&self, column: ValueColumn) -> Option<&str> {
        match column {
            ValueColumn::Quantity => self.quantity.as_deref(),
            ValueColumn::PriceAmount => self.price_amount.as_deref(),
        }
    }
}

/// Wire shape of a `<timeInterval>` element. Timestamps stay raw text
/// here; the series decoder parses and validates them.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimeInterval {
    pub start: String,
    pub end: String,
}

/// Wire shape of a `<Period>` element.
///
/// Each `TimeSeries` owns exactly one `Period`; a document declaring more
/// than one fails to decode rather than silently dropping data.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPeriod {
    #[serde(rename = "timeInterval")]
    pub time_interval: RawTimeInterval,
    pub resolution: String,
    #[serde(rename = "Point", default)]
    pub points: Vec<RawPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPsrType {
    #[serde(rename = "psrType")]
    pub psr_type: String,
}

/// Wire shape of a `<TimeSeries>` element. `MktPSRType` is only present
/// in generation documents.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimeSeries {
    #[serde(rename = "MktPSRType", default)]
    pub psr_type: Option<RawPsrType>,
    #[serde(rename = "Period")]
    pub period: RawPeriod,
}

/// Body of a data document: the normalized series list.
///
/// A response carries either a single bare `TimeSeries` element or a run
/// of them; serde accumulates both shapes into the same `Vec`, so no code
/// past this point ever branches on single-vs-sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMarketDocument {
    #[serde(rename = "TimeSeries", default)]
    pub series: Vec<RawTimeSeries>,
}

/// A decoded response, tagged by its root element.
#[derive(Debug, Clone)]
pub enum MarketDocument {
    /// `Publication_MarketDocument`: flows and day-ahead prices.
    Publication(RawMarketDocument),
    /// `GL_MarketDocument`: generation per production type.
    Generation(RawMarketDocument),
    /// Any other root, typically an acknowledgement carrying no data.
    /// Contributes zero rows downstream; never an error.
    Unrecognized,
}

/// Decode one raw XML response body.
pub fn decode_document(xml: &str) -> Result<MarketDocument, Error> {
    match root_tag(xml)?.as_deref() {
        Some("Publication_MarketDocument") => from_xml(xml).map(MarketDocument::Publication),
        Some("GL_MarketDocument") => from_xml(xml).map(MarketDocument::Generation),
        _ => Ok(MarketDocument::Unrecognized),
    }
}

fn from_xml(xml: &str) -> Result<RawMarketDocument, Error> {
    quick_xml::de::from_str(xml).map_err(|e| Error::Decode(e.to_string()))
}

/// Local name of the document's root element, if the document has one.
fn root_tag(xml: &str) -> Result<Option<String>, Error> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                let local = name.local_name();
                return Ok(Some(String::from_utf8_lossy(local.as_ref()).into_owned()));
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => continue,
            Err(e) => return Err(Error::Decode(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOW_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Publication_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-3:publicationdocument:7:0">
  <mRID>2af4fbeb4d071f3a0a2d1b64b2f74815</mRID>
  <type>A11</type>
  <TimeSeries>
    <mRID>1</mRID>
    <Period>
      <timeInterval>
        <start>2023-04-01T00:00Z</start>
        <end>2023-04-01T03:00Z</end>
      </timeInterval>
      <resolution>PT60M</resolution>
      <Point><position>1</position><quantity>10</quantity></Point>
      <Point><position>2</position><quantity>20</quantity></Point>
      <Point><position>3</position><quantity>30</quantity></Point>
    </Period>
  </TimeSeries>
</Publication_MarketDocument>"#;

    const GENERATION_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GL_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-6:generationloaddocument:3:0">
  <type>A75</type>
  <TimeSeries>
    <MktPSRType><psrType>B01</psrType></MktPSRType>
    <Period>
      <timeInterval>
        <start>2023-04-01T00:00Z</start>
        <end>2023-04-01T02:00Z</end>
      </timeInterval>
      <resolution>PT60M</resolution>
      <Point><position>1</position><quantity>5</quantity></Point>
    </Period>
  </TimeSeries>
  <TimeSeries>
    <MktPSRType><psrType>B04</psrType></MktPSRType>
    <Period>
      <timeInterval>
        <start>2023-04-01T00:00Z</start>
        <end>2023-04-01T02:00Z</end>
      </timeInterval>
      <resolution>PT60M</resolution>
      <Point><position>1</position><quantity>7</quantity></Point>
    </Period>
  </TimeSeries>
</GL_MarketDocument>"#;

    const ACK_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Acknowledgement_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-1:acknowledgementdocument:8:1">
  <Reason><code>999</code><text>No matching data found</text></Reason>
</Acknowledgement_MarketDocument>"#;

    #[test]
    fn publication_root_is_recognized() {
        let doc = decode_document(FLOW_DOC).unwrap();
        let MarketDocument::Publication(body) = doc else {
            panic!("expected a publication document");
        };
        assert_eq!(body.series.len(), 1);
        assert_eq!(body.series[0].period.resolution, "PT60M");
        assert_eq!(body.series[0].period.points.len(), 3);
        assert_eq!(body.series[0].period.points[1].quantity.as_deref(), Some("20"));
    }

    #[test]
    fn single_series_decodes_as_one_element_sequence() {
        // One bare TimeSeries element and a sequence of them normalize to
        // the same representation; a two-series document just has more
        // entries of the same shape.
        let single = decode_document(FLOW_DOC).unwrap();
        let many = decode_document(GENERATION_DOC).unwrap();
        let MarketDocument::Publication(single) = single else {
            panic!("expected a publication document");
        };
        let MarketDocument::Generation(many) = many else {
            panic!("expected a generation document");
        };
        assert_eq!(single.series.len(), 1);
        assert_eq!(many.series.len(), 2);
        assert_eq!(
            many.series[0].psr_type.as_ref().map(|p| p.psr_type.as_str()),
            Some("B01")
        );
    }

    #[test]
    fn unknown_root_maps_to_unrecognized() {
        assert!(matches!(
            decode_document(ACK_DOC).unwrap(),
            MarketDocument::Unrecognized
        ));
        assert!(matches!(
            decode_document("").unwrap(),
            MarketDocument::Unrecognized
        ));
    }

    #[test]
    fn value_selection_follows_the_column() {
        let point = RawPoint {
            position: 1,
            quantity: None,
            price_amount: Some("42.07".to_string()),
        };
        assert_eq!(point.value(ValueColumn::PriceAmount), Some("42.07"));
        assert_eq!(point.value(ValueColumn::Quantity), None);
    }
}
