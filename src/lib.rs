pub mod configuration;

pub mod distribution {
    pub mod distributionerror;
    pub mod densityscale;
    pub mod momentkind;
    pub mod distributionstate;
    pub mod griddistribution;
}

pub mod fit {
    pub mod fiterror;
    pub mod fitreport;
    pub mod objective;
    pub mod constraint;
    pub mod smoothingfitter;
    pub mod maxentropyfitter;
}

pub mod math {
    pub mod grid;
    pub mod finitedifference;
    pub mod integration {
        pub mod gausskronrod;
    }
    pub mod optimization {
        pub mod lbfgsminimizer;
    }
}
