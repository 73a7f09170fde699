use leon3_core::soc::IrqAck;
use mockall::mock;

mock! {
    pub IrqLine {}
    impl IrqAck for IrqLine {
        fn acknowledge(&mut self, level: u8);
    }
}
