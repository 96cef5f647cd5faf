// @file: contact_engine/src/tests/csv_pipeline.rs
// @description: End-to-end checks of the CSV pipeline against realistic uploads.
// @author: LAS.

use std::io::{self, Read};
use chrono::NaiveDate;
use crate::core::errors::IngestionError;
use crate::ingestion::{parse_contacts, parse_contacts_with_report};


fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct BrokenStream;

impl Read for BrokenStream {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk detached"))
    }
}


//
// HAPPY PATH
//

#[test]
fn test_canonical_headers_emit_one_contact_per_row() {
    let csv = "Name,DateOfBirth,Married,Phone,Salary\n\
               \x20 Anna Petrova ,1990-06-15,true, +79001234567 ,55000\n\
               John Smith,12.03.1985,No,+15551234567,72000.25\n";

    let contacts = parse_contacts(csv.as_bytes()).unwrap();

    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].name, "Anna Petrova");
    assert_eq!(contacts[0].phone, "+79001234567");
    assert_eq!(contacts[0].date_of_birth, ymd(1990, 6, 15));
    assert!(contacts[0].married);
    assert_eq!(contacts[0].salary, 55000.0);

    assert_eq!(contacts[1].date_of_birth, ymd(1985, 3, 12));
    assert!(!contacts[1].married);
    assert_eq!(contacts[1].salary, 72000.25);
}

#[test]
fn test_russian_headers_and_values() {
    let csv = "Имя,Дата рождения,Женат,Телефон,Зарплата\n\
               Иван Иванов,01.02.1980,Да,+79990001122,\"45000,50\"\n";

    let contacts = parse_contacts(csv.as_bytes()).unwrap();

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Иван Иванов");
    assert_eq!(contacts[0].date_of_birth, ymd(1980, 2, 1));
    assert!(contacts[0].married);
    assert_eq!(contacts[0].salary, 45000.50);
}

#[test]
fn test_spaced_date_of_birth_alias_and_reordered_columns() {
    let csv = "Salary,Phone,Married,Date of birth,Name\n\
               1000,+100000,0,1999-12-31,Zed\n";

    let contacts = parse_contacts(csv.as_bytes()).unwrap();

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Zed");
    assert_eq!(contacts[0].date_of_birth, ymd(1999, 12, 31));
}


//
// ROW REJECTION
//

#[test]
fn test_bad_date_drops_only_that_row() {
    let csv = "Name,DateOfBirth,Married,Phone,Salary\n\
               Broken,not-a-date,true,+100000,10\n\
               Valid,1995-04-12,Yes,+100001,20\n";

    let contacts = parse_contacts(csv.as_bytes()).unwrap();

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Valid");
}

#[test]
fn test_space_grouped_salary_is_rejected() {
    let csv = "Name,DateOfBirth,Married,Phone,Salary\n\
               Grouped,1995-04-12,Yes,+100000,45 000.50\n";

    assert!(parse_contacts(csv.as_bytes()).unwrap().is_empty());
}

#[test]
fn test_row_missing_trailing_field_is_dropped() {
    let csv = "Name,DateOfBirth,Married,Phone,Salary\n\
               Whole,1995-04-12,true,+100000,100\n\
               Short,1995-04-12,true,+100000\n";

    let outcome = parse_contacts_with_report(csv.as_bytes()).unwrap();

    assert_eq!(outcome.contacts.len(), 1);
    assert_eq!(outcome.contacts[0].name, "Whole");
    assert_eq!(outcome.report.rows_seen, 2);
    assert_eq!(outcome.report.rows_parsed, 2);
    assert_eq!(outcome.report.rows_converted, 1);
}

#[test]
fn test_undecodable_row_is_skipped_and_reading_continues() {
    let mut csv: Vec<u8> = b"Name,DateOfBirth,Married,Phone,Salary\n".to_vec();
    csv.extend_from_slice(b"\xff\xfe,1990-01-01,true,+100000,10\n");
    csv.extend_from_slice(b"Anna,1990-01-01,true,+100000,10\n");

    let outcome = parse_contacts_with_report(csv.as_slice()).unwrap();

    assert_eq!(outcome.contacts.len(), 1);
    assert_eq!(outcome.report.rows_seen, 2);
    assert_eq!(outcome.report.rows_parsed, 1);
}

#[test]
fn test_blank_lines_are_ignored() {
    let csv = "Name,DateOfBirth,Married,Phone,Salary\n\n\
               Anna,1990-01-01,true,+100000,10\n\n\n";

    let outcome = parse_contacts_with_report(csv.as_bytes()).unwrap();

    assert_eq!(outcome.contacts.len(), 1);
    assert_eq!(outcome.report.rows_seen, 1);
}

#[test]
fn test_unknown_headers_yield_no_contacts() {
    let csv = "name,dob,married,phone,salary\n\
               Anna,1990-01-01,true,+100000,10\n";

    assert!(parse_contacts(csv.as_bytes()).unwrap().is_empty());
}


//
// STREAM FAILURES
//

#[test]
fn test_empty_stream_is_not_an_error() {
    assert!(parse_contacts(&b""[..]).unwrap().is_empty());
}

#[test]
fn test_unreadable_stream_is_a_single_error() {
    let result = parse_contacts(BrokenStream);

    match result {
        Err(IngestionError::Unreadable(e)) => assert!(e.is_io_error()),
        other => panic!("expected Unreadable, got {:?}", other),
    }
}
