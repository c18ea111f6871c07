//! Unit tests for flow export loading

use signaldesk::error::FlowError;
use signaldesk::flows::load_flow_csv;
use signaldesk::models::flow::OptionSide;

const NAMED_CSV: &str = "\
Ticker,Expiration Date,Days Until Expiration,Strike Price,Contract Type,Reference Price,Size,Premium Price,Side Code,Is Unusual,Is Golden Sweep,Is Opening Position,Money Type
nvda,2024-01-19,10,$110.00,CALL,100,200,\"$100,000\",AA,Yes,No,Yes,OUT_THE_MONEY
AMD,2024-01-19,10,150,PUT,160,300,50000,BB,No,No,Yes,IN_THE_MONEY
TSLA,2024-01-19,10,250,CALL,200,100,75000,A,No,Yes,No,OUT_THE_MONEY
META,2024-01-19,10,abc,CALL,300,100,75000,A,No,No,Yes,OUT_THE_MONEY
";

#[test]
fn keeps_out_of_the_money_opening_flows() {
    let flows = load_flow_csv(NAMED_CSV.as_bytes()).unwrap();
    assert_eq!(flows.len(), 1);

    let nvda = &flows[0];
    assert_eq!(nvda.ticker, "NVDA");
    assert_eq!(nvda.side, OptionSide::Call);
    assert_eq!(nvda.strike, 110.0);
    assert_eq!(nvda.premium, 100_000.0);
    assert_eq!(nvda.size, 200);
    assert_eq!(nvda.days_to_expiration, 10);
    assert_eq!(nvda.side_code.as_deref(), Some("AA"));
    assert!(nvda.is_unusual);
    assert!(!nvda.is_golden_sweep);
    assert!(nvda.is_opening);
    assert_eq!(nvda.score, 0.0);
    assert!((nvda.move_pct() - 10.0).abs() < 1e-9);
}

#[test]
fn unnamed_exports_are_read_by_position() {
    let csv = "\
id,time,sym,exp,dte,strike,type,ref,size,price,ask,bid,premium,trade,cons,unusual,golden,opening,money
1,10:00,spy,2024-01-12,3,470,PUT,475,500,1.2,1.3,1.1,60000,SWEEP,X,No,Yes,Yes,OUT_THE_MONEY
";
    let flows = load_flow_csv(csv.as_bytes()).unwrap();
    assert_eq!(flows.len(), 1);

    let spy = &flows[0];
    assert_eq!(spy.ticker, "SPY");
    assert_eq!(spy.side, OptionSide::Put);
    assert_eq!(spy.reference_price, 475.0);
    assert_eq!(spy.option_price, Some(1.2));
    assert_eq!(spy.premium, 60_000.0);
    assert!(spy.is_golden_sweep);
    assert_eq!(spy.side_code, None);
}

#[test]
fn export_without_premium_is_rejected() {
    let csv = "Ticker,Expiration Date,Contract Type\nAAPL,2024-01-19,CALL\n";
    let err = load_flow_csv(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, FlowError::MissingColumn(ref c) if c == "Premium Price"));
}
