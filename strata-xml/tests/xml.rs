use indoc::indoc;
use strata_coder::{Coder, CoderOptions, Decode, Decoder, Encode, Encoder, NamingPolicy};
use strata_mapper::{InputMappable, Mapper, OutMapper, OutputMappable};
use strata_value::{MappingError, MappingErrorKind, StructuredValue, key_space};
use strata_xml::{XmlElement, XmlError, XmlNode, XmlWriteOptions};

key_space! {
    enum NestKey {
        Int = "int",
    }
}

#[derive(Debug, PartialEq)]
struct Nest {
    int: i64,
}

impl InputMappable for Nest {
    type Key = NestKey;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, NestKey, S>) -> Result<Self, MappingError> {
        Ok(Nest {
            int: mapper.map(&[NestKey::Int])?,
        })
    }
}

impl OutputMappable for Nest {
    type Key = NestKey;

    fn to_mapper<S: StructuredValue>(&self, mapper: &mut OutMapper<NestKey, S>) -> Result<(), MappingError> {
        mapper.map(&self.int, &[NestKey::Int])
    }
}

key_space! {
    enum RecordKey {
        Id = "id",
        Text = "string",
        Ints = "ints",
        Nest = "nest",
    }
}

#[derive(Debug, PartialEq)]
struct Record {
    id: Option<u32>,
    string: String,
    ints: Vec<i64>,
    nest: Nest,
}

impl InputMappable for Record {
    type Key = RecordKey;

    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, RecordKey, S>) -> Result<Self, MappingError> {
        Ok(Record {
            id: mapper.map_optional(&[RecordKey::Id])?,
            string: mapper.map(&[RecordKey::Text])?,
            ints: mapper.map(&[RecordKey::Ints])?,
            nest: mapper.map(&[RecordKey::Nest])?,
        })
    }
}

impl OutputMappable for Record {
    type Key = RecordKey;

    fn to_mapper<S: StructuredValue>(&self, mapper: &mut OutMapper<RecordKey, S>) -> Result<(), MappingError> {
        mapper.map(&self.string, &[RecordKey::Text])?;
        mapper.map(&self.ints, &[RecordKey::Ints])?;
        mapper.map(&self.nest, &[RecordKey::Nest])
    }
}

fn rio() -> Record {
    Record {
        id: None,
        string: "Rio-2016".into(),
        ints: vec![2, 5, 4],
        nest: Nest { int: 11 },
    }
}

#[strata_testhelpers::test]
fn records_read_from_xml_text() {
    let doc = strata_xml::from_str(indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <record>
          <string>Rio-2016</string>
          <ints><int>2</int><int>5</int><int>4</int></ints>
          <nest><int>11</int></nest>
        </record>
    "#})
    .unwrap();
    assert_eq!(Record::from_tree(&doc).unwrap(), rio());
}

#[strata_testhelpers::test]
fn attributes_read_as_fields() {
    let doc = strata_xml::from_str(
        r#"<record id="7"><string>a &amp; b</string><ints/><nest><int>1</int></nest></record>"#,
    )
    .unwrap();
    let record = Record::from_tree(&doc).unwrap();
    assert_eq!(record.id, Some(7));
    assert_eq!(record.string, "a & b");
    assert!(record.ints.is_empty());
}

#[strata_testhelpers::test]
fn records_round_trip_through_xml_text() {
    let tree: XmlNode = rio().to_tree().unwrap();
    let text = strata_xml::to_string(&tree, "record").unwrap();
    insta::assert_snapshot!(text, @"<record><string>Rio-2016</string><ints><item>2</item><item>5</item><item>4</item></ints><nest><int>11</int></nest></record>");

    let doc = strata_xml::from_str(&text).unwrap();
    assert_eq!(Record::from_tree(&doc).unwrap(), rio());
}

#[strata_testhelpers::test]
fn unparseable_text_is_a_type_mismatch() {
    let doc = strata_xml::from_str(
        "<record><string>x</string><ints><i>1</i><i>one</i></ints><nest><int>1</int></nest></record>",
    )
    .unwrap();
    let err = Record::from_tree(&doc).unwrap_err();
    assert!(err.is_type_error());
    insta::assert_snapshot!(err, @"at .ints[1]: type mismatch: expected i64, got string");
}

#[derive(Debug, PartialEq)]
struct Meter {
    serial_number: u64,
    last_ratio: f64,
    labels: Vec<String>,
}

impl Decode for Meter {
    fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError> {
        let mut fields = decoder.keyed()?;
        Ok(Meter {
            serial_number: fields.decode("serialNumber")?,
            last_ratio: fields.decode("lastRatio")?,
            labels: fields.decode("labels")?,
        })
    }
}

impl Encode for Meter {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        let mut fields = encoder.keyed()?;
        fields.encode("serialNumber", &self.serial_number)?;
        fields.encode("lastRatio", &self.last_ratio)?;
        fields.encode("labels", &self.labels)
    }
}

#[strata_testhelpers::test]
fn coder_reads_and_writes_xml() {
    let coder = Coder::new(CoderOptions::new().naming(NamingPolicy::SnakeCase));
    let doc = strata_xml::from_str(indoc! {r#"
        <meter>
          <serial_number>7</serial_number>
          <last_ratio>2.5</last_ratio>
          <labels><label>hall</label><label>east</label></labels>
        </meter>
    "#})
    .unwrap();
    let meter: Meter = coder.decode(&doc).unwrap();
    assert_eq!(
        meter,
        Meter {
            serial_number: 7,
            last_ratio: 2.5,
            labels: vec!["hall".into(), "east".into()],
        }
    );

    let written: XmlNode = coder.encode(&meter).unwrap();
    let text = strata_xml::to_string_with(&written, "meter", &XmlWriteOptions::new().pretty()).unwrap();
    insta::assert_snapshot!(text, @r"
    <meter>
      <serial_number>7</serial_number>
      <last_ratio>2.5</last_ratio>
      <labels>
        <item>hall</item>
        <item>east</item>
      </labels>
    </meter>
    ");
}

#[strata_testhelpers::test]
fn writer_escapes_and_collapses_empty_elements() {
    let tree = XmlNode::Element(
        XmlElement::new("note")
            .attribute("title", "\"quoted\" <b>")
            .child(XmlElement::with_text("body", "1 < 2 & 3 > 2"))
            .child(XmlElement::new("empty")),
    );
    let text = strata_xml::to_string_with(&tree, "note", &XmlWriteOptions::new().indent("\t")).unwrap();
    let reparsed = strata_xml::from_str(&text).unwrap();
    let XmlNode::Element(root) = &reparsed else {
        panic!("root is not an element");
    };
    assert_eq!(root.attributes["title"], "\"quoted\" <b>");
    assert!(text.contains("\t<empty/>"));
    assert_eq!(root.children.len(), 2);
}

#[strata_testhelpers::test]
fn text_roots_are_wrapped() {
    let text = strata_xml::to_string(&XmlNode::string("hi".into()), "greeting").unwrap();
    assert_eq!(text, "<greeting>hi</greeting>");
}

#[strata_testhelpers::test]
fn arrays_have_no_root_element() {
    let list = XmlNode::array(vec![XmlNode::int(1)]);
    let err = strata_xml::to_string(&list, "root").unwrap_err();
    assert!(matches!(err.kind, MappingErrorKind::CannotRepresentAsArray));
}

#[strata_testhelpers::test]
fn malformed_documents() {
    let err = strata_xml::from_str("<a/><b/>").unwrap_err();
    assert!(matches!(err, XmlError::MultipleRoots));
    insta::assert_snapshot!(err, @"XML document has multiple root elements");

    let err = strata_xml::from_str("<a><b></b>").unwrap_err();
    assert!(matches!(err, XmlError::UnbalancedTags | XmlError::Parse(_)));

    let err = strata_xml::from_str("<a></b>").unwrap_err();
    assert!(matches!(err, XmlError::Parse(_)));

    let err = strata_xml::from_str("   ").unwrap_err();
    assert!(matches!(err, XmlError::UnexpectedEof));

    let err = MappingError::from(XmlError::UnbalancedTags);
    insta::assert_snapshot!(err, @"data corrupted: unbalanced XML tags");
}
