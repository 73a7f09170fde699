use leon3_core::common::error::{Exception, MemoryError, SimError};
use leon3_core::common::data::Asi;
use rstest::rstest;

#[test]
fn test_exception_ids_round_trip() {
    for (id, exception) in Exception::ALL.iter().enumerate() {
        assert_eq!(exception.id() as usize, id);
        assert_eq!(Exception::from_id(id as u8), Some(*exception));
    }
    assert_eq!(Exception::from_id(39), None);
}

#[rstest]
#[case(1, Exception::InterruptLevel1, 37)]
#[case(11, Exception::InterruptLevel11, 27)]
#[case(15, Exception::InterruptLevel15, 23)]
fn test_interrupt_mapping(#[case] level: u8, #[case] exception: Exception, #[case] id: u8) {
    assert_eq!(Exception::interrupt(level), Some(exception));
    assert_eq!(exception.id(), id);
    assert_eq!(exception.interrupt_level(), Some(level));
    assert!(exception.is_interrupt());
    assert!(!exception.is_precise());
}

#[test]
fn test_interrupt_rejects_out_of_range_levels() {
    assert_eq!(Exception::interrupt(0), None);
    assert_eq!(Exception::interrupt(16), None);
}

#[test]
fn test_precise_exceptions_are_not_interrupts() {
    for exception in [
        Exception::Reset,
        Exception::IllegalInstruction,
        Exception::DivisionByZero,
        Exception::TrapInstruction,
    ] {
        assert!(exception.is_precise());
        assert!(!exception.is_interrupt());
        assert_eq!(exception.interrupt_level(), None);
    }
    assert!(!Exception::ImplDependent.is_interrupt());
    assert!(!Exception::ImplDependent.is_precise());
}

#[rstest]
#[case(Exception::DivisionByZero, "DIV_ZERO")]
#[case(Exception::PrivilegedInstruction, "PRIVILEDGE_INSTR")]
#[case(Exception::InterruptLevel15, "IRQ_LEV_15")]
#[case(Exception::WindowOverflow, "WINDOW_OVERFLOW")]
fn test_exception_names(#[case] exception: Exception, #[case] name: &str) {
    assert_eq!(exception.name(), name);
    assert_eq!(exception.to_string(), name);
}

#[test]
fn test_error_messages_carry_addresses() {
    let err = MemoryError::Unmapped {
        addr: 0x1234,
        asi: Asi::SUPERVISOR_DATA,
    };
    assert!(err.to_string().contains("0x00001234"));

    let fatal = SimError::InvalidInstruction {
        word: 0x81a0_0000,
        pc: 0x4000_0010,
    };
    let text = fatal.to_string();
    assert!(text.contains("0x81a00000"));
    assert!(text.contains("0x40000010"));

    let wrapped: SimError = err.into();
    assert!(matches!(wrapped, SimError::Memory(MemoryError::Unmapped { addr: 0x1234, .. })));
}
